use crate::config::ConfigError;
use std::path::{Path, PathBuf};

pub const STATE_ROOT_ENV: &str = "IMMOFLOW_HOME";
pub const GLOBAL_STATE_DIR: &str = ".immoflow";
pub const SETTINGS_FILE_NAME: &str = "config.yaml";

/// Well-known locations under the state root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    root: PathBuf,
}

impl StatePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$IMMOFLOW_HOME`, else `$HOME/.immoflow`.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Some(root) = std::env::var_os(STATE_ROOT_ENV).filter(|value| !value.is_empty()) {
            return Ok(Self::new(root));
        }
        let home = std::env::var_os("HOME").ok_or(ConfigError::HomeDirectoryUnavailable)?;
        Ok(Self::new(PathBuf::from(home).join(GLOBAL_STATE_DIR)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings_file(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE_NAME)
    }

    pub fn state_dir(&self) -> PathBuf {
        self.root.join("state")
    }

    pub fn sqlite_db(&self) -> PathBuf {
        self.root.join("workflow_state.sqlite3")
    }

    pub fn log_file(&self) -> PathBuf {
        self.root.join("logs").join("workflow.log")
    }
}
