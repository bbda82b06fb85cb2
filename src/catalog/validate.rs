use super::definition::{WorkflowDefinition, WorkflowKind};
use super::locale::FALLBACK_LOCALE;
use crate::shared::ids::StepId;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog yaml in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to encode catalog yaml: {0}")]
    Encode(#[source] serde_yaml::Error),
    #[error("workflow `{workflow}` is defined more than once")]
    DuplicateWorkflow { workflow: WorkflowKind },
    #[error("workflow `{workflow}` requires at least one step")]
    EmptyWorkflow { workflow: WorkflowKind },
    #[error("workflow `{workflow}` requires a `{locale}` title", locale = FALLBACK_LOCALE)]
    MissingTitle { workflow: WorkflowKind },
    #[error("workflow `{workflow}` contains duplicate step id `{step}`")]
    DuplicateStep { workflow: WorkflowKind, step: StepId },
    #[error("workflow `{workflow}` step `{step}` requires non-empty `path`")]
    EmptyPath { workflow: WorkflowKind, step: StepId },
    #[error(
        "workflow `{workflow}` step `{step}` requires a `{locale}` label",
        locale = FALLBACK_LOCALE
    )]
    MissingLabel { workflow: WorkflowKind, step: StepId },
    #[error("workflow `{workflow}` step `{step}` requires unknown step `{required}`")]
    UnknownRequiredStep {
        workflow: WorkflowKind,
        step: StepId,
        required: StepId,
    },
    #[error("workflow `{workflow}` step `{step}` requires itself")]
    SelfRequirement { workflow: WorkflowKind, step: StepId },
    #[error("workflow `{workflow}` has a prerequisite cycle through steps: {}", join_ids(.steps))]
    PrerequisiteCycle {
        workflow: WorkflowKind,
        steps: Vec<StepId>,
    },
}

fn join_ids(ids: &[StepId]) -> String {
    ids.iter()
        .map(StepId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn validate_workflows(workflows: &[WorkflowDefinition]) -> Result<(), CatalogError> {
    let mut kinds = HashSet::new();
    for workflow in workflows {
        if !kinds.insert(workflow.id) {
            return Err(CatalogError::DuplicateWorkflow {
                workflow: workflow.id,
            });
        }
        validate_workflow(workflow)?;
    }
    Ok(())
}

pub fn validate_workflow(workflow: &WorkflowDefinition) -> Result<(), CatalogError> {
    let kind = workflow.id;
    if workflow.steps.is_empty() {
        return Err(CatalogError::EmptyWorkflow { workflow: kind });
    }
    if workflow.title.get(FALLBACK_LOCALE).is_none() {
        return Err(CatalogError::MissingTitle { workflow: kind });
    }

    let mut step_ids = HashSet::new();
    for step in &workflow.steps {
        if !step_ids.insert(step.id.as_str()) {
            return Err(CatalogError::DuplicateStep {
                workflow: kind,
                step: step.id.clone(),
            });
        }
        if step.path.trim().is_empty() {
            return Err(CatalogError::EmptyPath {
                workflow: kind,
                step: step.id.clone(),
            });
        }
        if step.label.get(FALLBACK_LOCALE).is_none() {
            return Err(CatalogError::MissingLabel {
                workflow: kind,
                step: step.id.clone(),
            });
        }
    }

    for step in &workflow.steps {
        for required in &step.required_steps {
            if required == &step.id {
                return Err(CatalogError::SelfRequirement {
                    workflow: kind,
                    step: step.id.clone(),
                });
            }
            if !step_ids.contains(required.as_str()) {
                return Err(CatalogError::UnknownRequiredStep {
                    workflow: kind,
                    step: step.id.clone(),
                    required: required.clone(),
                });
            }
        }
    }

    let cycle = steps_on_prerequisite_cycles(workflow);
    if !cycle.is_empty() {
        return Err(CatalogError::PrerequisiteCycle {
            workflow: kind,
            steps: cycle,
        });
    }
    Ok(())
}

/// Kahn's algorithm over the prerequisite graph. Whatever cannot be peeled off
/// sits on, or behind, a cycle. Returned in definition order.
fn steps_on_prerequisite_cycles(workflow: &WorkflowDefinition) -> Vec<StepId> {
    let mut in_degree: BTreeMap<&str, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for step in &workflow.steps {
        in_degree.entry(step.id.as_str()).or_insert(0);
        for required in &step.required_steps {
            *in_degree.entry(step.id.as_str()).or_insert(0) += 1;
            dependents
                .entry(required.as_str())
                .or_default()
                .push(step.id.as_str());
        }
    }

    let mut ready = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(id, _)| *id)
        .collect::<Vec<_>>();
    while let Some(id) = ready.pop() {
        for &dependent in dependents.get(id).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(dependent) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push(dependent);
                }
            }
        }
    }

    workflow
        .steps
        .iter()
        .filter(|step| in_degree.get(step.id.as_str()).is_some_and(|d| *d > 0))
        .map(|step| step.id.clone())
        .collect()
}
