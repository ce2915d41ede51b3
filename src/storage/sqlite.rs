//! SQLite storage: the collection list is a JSON value in the `kv_store` table.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use super::PersistencePort;
use crate::database::Database;
use crate::types::collection::Collection;
use crate::types::errors::StorageError;

pub struct SqliteStorage {
    db: Mutex<Database>,
}

impl SqliteStorage {
    /// Opens (or creates) the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        Ok(Self::from_database(Database::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self::from_database(Database::open_in_memory()?))
    }

    pub fn from_database(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let db = self.db.lock().map_err(|e| StorageError::Database(e.to_string()))?;
        let value = db
            .connection()
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let db = self.db.lock().map_err(|e| StorageError::Database(e.to_string()))?;
        let now = chrono::Utc::now().timestamp_millis();
        db.connection().execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }
}

#[async_trait]
impl PersistencePort for SqliteStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<Collection>>, StorageError> {
        match self.read(key)? {
            Some(json) => {
                let collections = serde_json::from_str(&json)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?;
                Ok(Some(collections))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, collections: &[Collection]) -> Result<(), StorageError> {
        let json = serde_json::to_string(collections)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.write(key, &json)
    }
}
