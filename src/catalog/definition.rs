use super::locale::LocalizedText;
use crate::shared::ids::StepId;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum WorkflowKind {
    #[serde(rename = "steuer-optimierung")]
    TaxOptimization,
    #[serde(rename = "immobilien-verwaltung")]
    PropertyManagement,
    #[serde(rename = "finanzierung")]
    Financing,
    #[serde(rename = "analyse")]
    Analysis,
}

pub const ALL_WORKFLOW_KINDS: [WorkflowKind; 4] = [
    WorkflowKind::TaxOptimization,
    WorkflowKind::PropertyManagement,
    WorkflowKind::Financing,
    WorkflowKind::Analysis,
];

impl WorkflowKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TaxOptimization => "steuer-optimierung",
            Self::PropertyManagement => "immobilien-verwaltung",
            Self::Financing => "finanzierung",
            Self::Analysis => "analyse",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "steuer-optimierung" | "tax-optimization" => Ok(Self::TaxOptimization),
            "immobilien-verwaltung" | "property-management" => Ok(Self::PropertyManagement),
            "finanzierung" | "financing" => Ok(Self::Financing),
            "analyse" | "analysis" => Ok(Self::Analysis),
            _ => Err(concat!(
                "workflow kind must be one of: steuer-optimierung, ",
                "immobilien-verwaltung, finanzierung, analyse"
            )
            .to_string()),
        }
    }
}

impl std::fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for WorkflowKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .map_err(|err| D::Error::custom(format!("invalid workflow kind `{raw}`: {err}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub id: StepId,
    pub path: String,
    pub label: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedText>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_steps: Vec<StepId>,
    /// Minutes; informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub id: WorkflowKind,
    pub title: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedText>,
    pub steps: Vec<WorkflowStep>,
}

impl WorkflowDefinition {
    pub fn step(&self, step_id: &str) -> Option<&WorkflowStep> {
        self.steps.iter().find(|step| step.id.as_str() == step_id)
    }

    pub fn step_index(&self, step_id: &str) -> Option<usize> {
        self.steps
            .iter()
            .position(|step| step.id.as_str() == step_id)
    }

    pub fn first_step(&self) -> Option<&WorkflowStep> {
        self.steps.first()
    }

    /// The step following `step_id` in definition order.
    pub fn step_after(&self, step_id: &str) -> Option<&WorkflowStep> {
        self.step_index(step_id)
            .and_then(|index| self.steps.get(index + 1))
    }

    pub fn is_last_step(&self, step_id: &str) -> bool {
        self.steps
            .last()
            .is_some_and(|step| step.id.as_str() == step_id)
    }

    pub fn total_estimated_time(&self) -> u32 {
        self.steps
            .iter()
            .filter_map(|step| step.estimated_time)
            .sum()
    }
}
