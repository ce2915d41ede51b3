//! SQLite connection for the collection database.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;

use super::migrations;
use crate::types::errors::StorageError;

/// A migrated SQLite connection, either file-backed or in memory.
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Opens (or creates) the database file at `path`, creating its parent
    /// directory first, and brings the schema up to date.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::Io(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        Self::migrated(Connection::open(path)?, Some(path.to_path_buf()))
    }

    /// Opens a migrated in-memory database, discarded on drop.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::migrated(Connection::open_in_memory()?, None)
    }

    fn migrated(conn: Connection, path: Option<PathBuf>) -> Result<Self, StorageError> {
        migrations::run_all(&conn)?;
        let db = Self { conn, path };
        log::debug!(
            "opened database {} at schema v{}",
            db.path
                .as_deref()
                .map_or_else(|| ":memory:".to_string(), |p| p.display().to_string()),
            db.schema_version()
        );
        Ok(db)
    }

    /// File backing the database, `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn schema_version(&self) -> i32 {
        migrations::get_schema_version(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
