use super::storage::{KeyValueStorage, StorageError};
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};

/// Key/value storage in a single SQLite table.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    db_path: PathBuf,
}

impl SqliteStorage {
    pub fn open(db_path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
                path: parent.display().to_string(),
                source,
            })?;
        }
        let storage = Self {
            db_path: db_path.to_path_buf(),
        };
        storage.ensure_schema()?;
        Ok(storage)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn ensure_schema(&self) -> Result<(), StorageError> {
        self.connect()?
            .execute_batch(
                "
                CREATE TABLE IF NOT EXISTS workflow_state (
                    key TEXT PRIMARY KEY NOT NULL,
                    value TEXT NOT NULL,
                    updated_at INTEGER NOT NULL
                );
                ",
            )
            .map_err(|source| StorageError::Sql { source })
    }

    fn connect(&self) -> Result<Connection, StorageError> {
        Connection::open(&self.db_path).map_err(|source| StorageError::SqliteOpen {
            path: self.db_path.display().to_string(),
            source,
        })
    }
}

impl KeyValueStorage for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.connect()?
            .query_row(
                "SELECT value FROM workflow_state WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|source| StorageError::Sql { source })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.connect()?
            .execute(
                "INSERT INTO workflow_state (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE
                 SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, crate::shared::now_secs()],
            )
            .map(|_| ())
            .map_err(|source| StorageError::Sql { source })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.connect()?
            .execute("DELETE FROM workflow_state WHERE key = ?1", params![key])
            .map(|_| ())
            .map_err(|source| StorageError::Sql { source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn upserts_and_removes_rows() {
        let dir = tempdir().expect("tempdir");
        let storage = SqliteStorage::open(&dir.path().join("db/state.sqlite3")).expect("open");

        assert_eq!(storage.get("k").expect("get"), None);
        storage.set("k", "one").expect("insert");
        storage.set("k", "two").expect("update");
        assert_eq!(storage.get("k").expect("get"), Some("two".to_string()));

        let reopened = SqliteStorage::open(storage.db_path()).expect("reopen");
        assert_eq!(reopened.get("k").expect("get"), Some("two".to_string()));

        reopened.remove("k").expect("remove");
        assert_eq!(storage.get("k").expect("get"), None);
    }
}
