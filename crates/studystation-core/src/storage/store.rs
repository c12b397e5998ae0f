//! Flat key -> JSON-value persistence.
//!
//! All durable state lives in one SQLite file as independent kv rows, one
//! logical name per row. Values are JSON; each key is loaded and saved on
//! its own, with no cross-key transactionality. A failed save leaves the
//! in-memory state authoritative -- callers log and continue.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::data_dir;
use crate::error::StorageError;

/// Logical key names for persisted state.
pub mod keys {
    pub const SAVED_VIDEOS: &str = "saved_videos";
    pub const SAVED_SHORTS: &str = "saved_shorts";
    pub const STUDY_DATA: &str = "study_data";
    pub const STUDY_TASKS: &str = "study_tasks";
    pub const STUDY_NOTES: &str = "study_notes";
    pub const POMODORO_SETTINGS: &str = "pomodoro_settings";
    pub const COMPLETED_POMODOROS: &str = "completed_pomodoros";
    pub const PLAYLISTS: &str = "playlists";
}

/// SQLite-backed key-value store.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the store at `~/.config/studystation/studystation.db`,
    /// creating file and schema if missing.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()?.join("studystation.db");
        Self::open_at(&path)
    }

    /// Open the store at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<bool, StorageError> {
        let n = self
            .conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(n > 0)
    }

    /// Load and decode the JSON value under `key`.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.kv_get(key)? {
            Some(raw) => {
                let value =
                    serde_json::from_str(&raw).map_err(|e| StorageError::CorruptValue {
                        key: key.to_string(),
                        message: e.to_string(),
                    })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Encode and store `value` under `key`.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|e| StorageError::CorruptValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.kv_set(key, &raw)
    }

    /// All keys currently present, sorted.
    pub fn kv_keys(&self) -> Result<Vec<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{Library, MediaItem};
    use crate::stats::StudyAccumulator;

    #[test]
    fn kv_roundtrip() {
        let store = Store::open_memory().unwrap();
        assert!(store.kv_get("missing").unwrap().is_none());

        store.kv_set("k", "v1").unwrap();
        assert_eq!(store.kv_get("k").unwrap().as_deref(), Some("v1"));

        store.kv_set("k", "v2").unwrap();
        assert_eq!(store.kv_get("k").unwrap().as_deref(), Some("v2"));

        assert!(store.kv_delete("k").unwrap());
        assert!(!store.kv_delete("k").unwrap());
    }

    #[test]
    fn json_roundtrip_library() {
        let store = Store::open_memory().unwrap();
        let mut lib = Library::new();
        lib.add(MediaItem::new("a").with_title("Algebra"));
        lib.add(MediaItem::new("b"));

        store.set_json(keys::SAVED_VIDEOS, &lib).unwrap();
        let loaded: Library = store.get_json(keys::SAVED_VIDEOS).unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("a").unwrap().title.as_deref(), Some("Algebra"));
    }

    #[test]
    fn json_roundtrip_accumulator() {
        let store = Store::open_memory().unwrap();
        let mut acc = StudyAccumulator::default();
        acc.add_focus_secs(90);
        acc.task_completed();
        store.set_json(keys::STUDY_DATA, &acc).unwrap();

        let loaded: StudyAccumulator = store.get_json(keys::STUDY_DATA).unwrap().unwrap();
        assert_eq!(loaded, acc);
    }

    #[test]
    fn corrupt_value_is_an_error_not_a_panic() {
        let store = Store::open_memory().unwrap();
        store.kv_set(keys::STUDY_DATA, "{not json").unwrap();
        let result: Result<Option<StudyAccumulator>, _> = store.get_json(keys::STUDY_DATA);
        assert!(matches!(
            result,
            Err(StorageError::CorruptValue { .. })
        ));
    }

    #[test]
    fn keys_are_listed_sorted() {
        let store = Store::open_memory().unwrap();
        store.kv_set("b", "1").unwrap();
        store.kv_set("a", "1").unwrap();
        assert_eq!(store.kv_keys().unwrap(), vec!["a", "b"]);
    }
}
