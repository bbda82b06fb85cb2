use crate::catalog::{WorkflowCatalog, WorkflowKind};
use crate::config::{load_settings, ConfigError, Settings, StatePaths, StorageBackend};
use crate::controller::{
    Collaborators, Notification, RecordingNavigator, RecordingNotifier, WorkflowController,
};
use crate::shared::logging::EventLog;
use crate::store::{FileStorage, KeyValueStorage, MemoryStorage, SqliteStorage, WorkflowStateStore};
use std::sync::Arc;

pub fn map_config_err(err: ConfigError) -> String {
    err.to_string()
}

/// Everything a command needs, resolved from the state root.
pub struct CommandContext {
    pub paths: StatePaths,
    pub settings: Settings,
    pub catalog: Arc<WorkflowCatalog>,
    pub log: EventLog,
}

impl CommandContext {
    pub fn load() -> Result<Self, String> {
        let paths = StatePaths::from_env().map_err(map_config_err)?;
        Self::load_from(paths)
    }

    pub fn load_from(paths: StatePaths) -> Result<Self, String> {
        let settings = load_settings(&paths).map_err(map_config_err)?;
        let catalog = match &settings.catalog_path {
            Some(path) => WorkflowCatalog::from_path(path).map_err(|e| e.to_string())?,
            None => WorkflowCatalog::builtin(),
        };
        let log = if settings.logging.enabled {
            EventLog::to_file(paths.log_file())
        } else {
            EventLog::disabled()
        };
        Ok(Self {
            paths,
            settings,
            catalog: Arc::new(catalog),
            log,
        })
    }

    pub fn open_storage(&self) -> Result<Box<dyn KeyValueStorage>, String> {
        let storage: Box<dyn KeyValueStorage> = match self.settings.storage.backend {
            StorageBackend::File => {
                Box::new(FileStorage::open(self.paths.state_dir()).map_err(|e| e.to_string())?)
            }
            StorageBackend::Sqlite => Box::new(
                SqliteStorage::open(&self.paths.sqlite_db()).map_err(|e| e.to_string())?,
            ),
            StorageBackend::Memory => Box::new(MemoryStorage::new()),
        };
        Ok(storage)
    }

    pub fn open_store(&self) -> Result<WorkflowStateStore, String> {
        Ok(WorkflowStateStore::new(self.open_storage()?)
            .with_key_prefix(self.settings.storage.key_prefix.clone())
            .with_event_log(self.log.clone()))
    }

    pub fn open_controller(&self, kind: WorkflowKind) -> Result<CommandController, String> {
        let navigator = RecordingNavigator::default();
        let notifier = RecordingNotifier::default();
        let controller = WorkflowController::new(
            Arc::clone(&self.catalog),
            kind,
            self.open_store()?,
            Collaborators::new(navigator.clone(), notifier.clone(), self.settings.locale),
            self.settings.controller,
        )
        .map_err(|e| e.to_string())?
        .with_event_log(self.log.clone());
        Ok(CommandController {
            controller,
            navigator,
            notifier,
        })
    }
}

/// A controller wired to recording collaborators so side effects can be printed.
pub struct CommandController {
    pub controller: WorkflowController,
    pub navigator: RecordingNavigator,
    pub notifier: RecordingNotifier,
}

impl CommandController {
    pub fn side_effect_lines(&self) -> Vec<String> {
        let mut lines = self
            .navigator
            .take()
            .into_iter()
            .map(|path| format!("navigate={path}"))
            .collect::<Vec<_>>();
        lines.extend(self.notifier.take().iter().map(notification_line));
        lines
    }
}

pub fn notification_line(notification: &Notification) -> String {
    format!(
        "notify={}|{}|{}",
        notification.kind, notification.title, notification.description
    )
}

pub fn parse_kind(raw: &str) -> Result<WorkflowKind, String> {
    WorkflowKind::parse(raw)
}

pub fn join_ids<T: std::fmt::Display>(ids: &[T]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
