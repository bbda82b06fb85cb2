use crate::shared::ids::{DataKey, StepId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Persisted progress of one workflow kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowProgressRecord {
    #[serde(default)]
    pub completed_step_ids: Vec<StepId>,
    #[serde(default)]
    pub current_step_id: Option<StepId>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<DataKey, Value>,
    #[serde(default)]
    pub updated_at: i64,
}

impl WorkflowProgressRecord {
    pub fn is_complete(&self, step_id: &str) -> bool {
        self.completed_step_ids
            .iter()
            .any(|id| id.as_str() == step_id)
    }

    /// Returns `false` when the step was already recorded.
    pub fn mark_complete(&mut self, step_id: &StepId) -> bool {
        if self.is_complete(step_id.as_str()) {
            return false;
        }
        self.completed_step_ids.push(step_id.clone());
        true
    }

    pub fn completed_set(&self) -> BTreeSet<StepId> {
        self.completed_step_ids.iter().cloned().collect()
    }
}
