//! Immutable workflow definitions.
//!
//! The catalog is validated once when it is built, so every lookup afterwards
//! can assume unique step ids, resolvable prerequisites and an acyclic
//! prerequisite graph.

mod builtin;
pub mod definition;
pub mod locale;
pub mod validate;

pub use definition::{WorkflowDefinition, WorkflowKind, WorkflowStep, ALL_WORKFLOW_KINDS};
pub use locale::{Locale, LocalizedText, ALL_LOCALES, FALLBACK_LOCALE};
pub use validate::CatalogError;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowCatalog {
    workflows: Vec<WorkflowDefinition>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    workflows: Vec<WorkflowDefinition>,
}

impl WorkflowCatalog {
    pub fn new(workflows: Vec<WorkflowDefinition>) -> Result<Self, CatalogError> {
        validate::validate_workflows(&workflows)?;
        Ok(Self { workflows })
    }

    pub fn builtin() -> Self {
        Self {
            workflows: builtin::builtin_workflows(),
        }
    }

    pub fn from_yaml_str(raw: &str, origin: &str) -> Result<Self, CatalogError> {
        let parsed: CatalogFile =
            serde_yaml::from_str(raw).map_err(|source| CatalogError::Parse {
                path: origin.to_string(),
                source,
            })?;
        Self::new(parsed.workflows)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&raw, &path.display().to_string())
    }

    pub fn to_yaml(&self) -> Result<String, CatalogError> {
        serde_yaml::to_string(self).map_err(CatalogError::Encode)
    }

    pub fn get(&self, kind: WorkflowKind) -> Option<&WorkflowDefinition> {
        self.workflows.iter().find(|workflow| workflow.id == kind)
    }

    pub fn workflows(&self) -> &[WorkflowDefinition] {
        &self.workflows
    }

    pub fn kinds(&self) -> impl Iterator<Item = WorkflowKind> + '_ {
        self.workflows.iter().map(|workflow| workflow.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_passes_validation_and_covers_every_kind() {
        let catalog = WorkflowCatalog::builtin();
        validate::validate_workflows(catalog.workflows()).expect("built-in catalog is valid");
        for kind in ALL_WORKFLOW_KINDS {
            let workflow = catalog.get(kind).expect("kind is defined");
            for step in &workflow.steps {
                for locale in ALL_LOCALES {
                    assert!(
                        step.label.get(locale).is_some(),
                        "{kind} step {} lacks a {locale} label",
                        step.id
                    );
                }
            }
        }
    }

    #[test]
    fn yaml_round_trip_preserves_builtin_catalog() {
        let catalog = WorkflowCatalog::builtin();
        let yaml = catalog.to_yaml().expect("encode");
        let reparsed = WorkflowCatalog::from_yaml_str(&yaml, "<memory>").expect("decode");
        assert_eq!(reparsed, catalog);
    }

    #[test]
    fn from_yaml_rejects_cycles_at_load_time() {
        let raw = r#"
workflows:
  - id: finanzierung
    title: { de: Finanzierung }
    steps:
      - id: offers
        path: /finanzierung/angebote
        label: { de: Angebote }
        required_steps: [tilgung]
      - id: tilgung
        path: /finanzierung/tilgungsplan
        label: { de: Tilgung }
        required_steps: [offers]
"#;
        let err = WorkflowCatalog::from_yaml_str(raw, "inline.yaml").expect_err("cycle");
        assert_eq!(
            err.to_string(),
            "workflow `finanzierung` has a prerequisite cycle through steps: offers, tilgung"
        );
    }

    #[test]
    fn partial_catalog_only_answers_for_defined_kinds() {
        let raw = r#"
workflows:
  - id: analysis
    title: { de: Analyse, en: Analysis }
    steps:
      - id: market-data
        path: /analyse/markt
        label: { de: Marktdaten }
        estimated_time: 10
"#;
        let catalog = WorkflowCatalog::from_yaml_str(raw, "inline.yaml").expect("valid");
        assert!(catalog.get(WorkflowKind::Analysis).is_some());
        assert!(catalog.get(WorkflowKind::Financing).is_none());
        assert_eq!(catalog.kinds().collect::<Vec<_>>(), vec![WorkflowKind::Analysis]);
    }
}
