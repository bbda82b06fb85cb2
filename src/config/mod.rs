pub mod error;
pub mod load;
pub mod paths;
pub mod settings;

pub use error::ConfigError;
pub use load::{load_settings, save_settings};
pub use paths::{StatePaths, GLOBAL_STATE_DIR, SETTINGS_FILE_NAME, STATE_ROOT_ENV};
pub use settings::{LoggingSettings, Settings, StorageBackend, StorageSettings};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Locale;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn restore_env(key: &str, value: Option<std::ffi::OsString>) {
        if let Some(value) = value {
            std::env::set_var(key, value);
        } else {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn state_root_prefers_immoflow_home() {
        let _guard = ENV_LOCK.lock().expect("env lock");
        let temp = tempdir().expect("temp dir");
        let old_root = std::env::var_os(STATE_ROOT_ENV);
        std::env::set_var(STATE_ROOT_ENV, temp.path().join("custom"));

        let paths = StatePaths::from_env().expect("resolve state root");
        assert_eq!(paths.root(), temp.path().join("custom"));
        assert_eq!(
            paths.settings_file(),
            temp.path().join("custom/config.yaml")
        );

        restore_env(STATE_ROOT_ENV, old_root);
    }

    #[test]
    fn state_root_falls_back_to_home() {
        let _guard = ENV_LOCK.lock().expect("env lock");
        let temp = tempdir().expect("temp dir");
        let old_root = std::env::var_os(STATE_ROOT_ENV);
        let old_home = std::env::var_os("HOME");
        std::env::remove_var(STATE_ROOT_ENV);
        std::env::set_var("HOME", temp.path());

        let paths = StatePaths::from_env().expect("resolve state root");
        assert_eq!(paths.root(), temp.path().join(".immoflow"));
        assert_eq!(paths.log_file(), temp.path().join(".immoflow/logs/workflow.log"));

        restore_env("HOME", old_home);
        restore_env(STATE_ROOT_ENV, old_root);
    }

    #[test]
    fn missing_settings_file_yields_defaults() {
        let temp = tempdir().expect("temp dir");
        let settings = load_settings(&StatePaths::new(temp.path())).expect("defaults");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.storage.backend, StorageBackend::File);
        assert_eq!(settings.storage.key_prefix, "immoflow-workflow-");
        assert_eq!(settings.locale, Locale::De);
        assert!(settings.logging.enabled);
        assert!(!settings.controller.cross_workflow_suggestions);
    }

    #[test]
    fn settings_parse_partial_yaml() {
        let settings = Settings::from_yaml_str(
            r#"
storage:
  backend: sqlite
locale: en-US
controller:
  partial_credit_for_active_step: true
logging:
  enabled: false
"#,
            "inline",
        )
        .expect("parse");
        assert_eq!(settings.storage.backend, StorageBackend::Sqlite);
        assert_eq!(settings.storage.key_prefix, "immoflow-workflow-");
        assert_eq!(settings.locale, Locale::En);
        assert!(settings.controller.partial_credit_for_active_step);
        assert!(!settings.controller.cross_workflow_suggestions);
        assert!(!settings.logging.enabled);
    }

    #[test]
    fn validation_rejects_relative_catalog_and_blank_prefix() {
        let mut settings = Settings {
            catalog_path: Some(PathBuf::from("catalog.yaml")),
            ..Settings::default()
        };
        let err = settings.validate().expect_err("relative catalog path");
        assert!(err.to_string().contains("catalog_path"));

        settings.catalog_path = None;
        settings.storage.key_prefix = "  ".to_string();
        let err = settings.validate().expect_err("blank prefix");
        assert!(err.to_string().contains("key_prefix"));
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let temp = tempdir().expect("temp dir");
        let paths = StatePaths::new(temp.path().join("root"));
        let settings = Settings {
            storage: StorageSettings {
                backend: StorageBackend::Memory,
                key_prefix: "test-".to_string(),
            },
            locale: Locale::En,
            catalog_path: Some(temp.path().join("catalog.yaml")),
            ..Settings::default()
        };
        let path = save_settings(&paths, &settings).expect("save");
        assert_eq!(path, paths.settings_file());
        assert!(fs::read_to_string(&path)
            .expect("read saved")
            .contains("backend: memory"));
        assert_eq!(load_settings(&paths).expect("load"), settings);
    }

    #[test]
    fn invalid_yaml_reports_path() {
        let temp = tempdir().expect("temp dir");
        let paths = StatePaths::new(temp.path());
        fs::write(paths.settings_file(), "storage: [not, a, map]\n").expect("write");
        let err = load_settings(&paths).expect_err("invalid yaml");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.yaml"));
    }
}
