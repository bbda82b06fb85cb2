//! Durable per-workflow progress.
//!
//! Reads and writes go through an injected [`KeyValueStorage`]. Storage or
//! decode failures are logged and absorbed here: callers always see a usable,
//! possibly empty, state and never an error.

pub mod record;
pub mod sqlite;
pub mod storage;

pub use record::WorkflowProgressRecord;
pub use sqlite::SqliteStorage;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};

use crate::catalog::WorkflowKind;
use crate::shared::ids::{DataKey, StepId};
use crate::shared::logging::{EventLog, LEVEL_ERROR, LEVEL_WARN};
use serde_json::Value;
use std::collections::BTreeSet;

pub const DEFAULT_KEY_PREFIX: &str = "immoflow-workflow-";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("workflow state under `{key}` is not valid json: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode workflow state for `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub struct WorkflowStateStore {
    storage: Box<dyn KeyValueStorage>,
    key_prefix: String,
    log: EventLog,
}

impl WorkflowStateStore {
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            log: EventLog::disabled(),
        }
    }

    pub fn with_key_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = key_prefix.into();
        self
    }

    pub fn with_event_log(mut self, log: EventLog) -> Self {
        self.log = log;
        self
    }

    pub fn storage_key(&self, kind: WorkflowKind) -> String {
        format!("{}{}", self.key_prefix, kind.as_str())
    }

    /// Strict read that reports storage and decode failures.
    pub fn load_record(
        &self,
        kind: WorkflowKind,
    ) -> Result<Option<WorkflowProgressRecord>, StoreError> {
        let key = self.storage_key(kind);
        let Some(raw) = self.storage.get(&key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Decode { key, source })
    }

    pub fn completed_steps(&self, kind: WorkflowKind) -> BTreeSet<StepId> {
        self.read_record(kind).completed_set()
    }

    pub fn is_step_complete(&self, kind: WorkflowKind, step_id: &str) -> bool {
        self.read_record(kind).is_complete(step_id)
    }

    pub fn current_step(&self, kind: WorkflowKind) -> Option<StepId> {
        self.read_record(kind).current_step_id
    }

    pub fn mark_step_complete(&self, kind: WorkflowKind, step_id: &StepId) {
        let mut record = self.read_record(kind);
        if record.mark_complete(step_id) {
            self.write_record(kind, &mut record);
        }
    }

    pub fn set_current_step(&self, kind: WorkflowKind, step_id: &StepId) {
        let mut record = self.read_record(kind);
        record.current_step_id = Some(step_id.clone());
        self.write_record(kind, &mut record);
    }

    pub fn reset_workflow(&self, kind: WorkflowKind) {
        let key = self.storage_key(kind);
        if let Err(err) = self.storage.remove(&key) {
            self.log_failure(LEVEL_ERROR, "state.write_failed", kind, &key, &err);
        }
    }

    pub fn save_workflow_data(&self, kind: WorkflowKind, data_key: &DataKey, value: Value) {
        let mut record = self.read_record(kind);
        record.data.insert(data_key.clone(), value);
        self.write_record(kind, &mut record);
    }

    pub fn workflow_data(&self, kind: WorkflowKind, data_key: &str) -> Option<Value> {
        self.read_record(kind).data.get(data_key).cloned()
    }

    fn read_record(&self, kind: WorkflowKind) -> WorkflowProgressRecord {
        match self.load_record(kind) {
            Ok(record) => record.unwrap_or_default(),
            Err(err) => {
                let event = match err {
                    StoreError::Decode { .. } => "state.decode_failed",
                    _ => "state.read_failed",
                };
                self.log_failure(LEVEL_WARN, event, kind, &self.storage_key(kind), &err);
                WorkflowProgressRecord::default()
            }
        }
    }

    fn write_record(&self, kind: WorkflowKind, record: &mut WorkflowProgressRecord) {
        let key = self.storage_key(kind);
        record.updated_at = crate::shared::now_secs();
        let written = serde_json::to_string(record)
            .map_err(|source| StoreError::Encode {
                key: key.clone(),
                source,
            })
            .and_then(|body| self.storage.set(&key, &body).map_err(StoreError::from));
        if let Err(err) = written {
            self.log_failure(LEVEL_ERROR, "state.write_failed", kind, &key, &err);
        }
    }

    fn log_failure(
        &self,
        level: &str,
        event: &str,
        kind: WorkflowKind,
        key: &str,
        err: &dyn std::error::Error,
    ) {
        self.log.append(
            level,
            event,
            &[
                ("workflow", Value::from(kind.as_str())),
                ("key", Value::from(key)),
                ("error", Value::from(err.to_string())),
            ],
        );
    }
}
