//! Persistence backends for the collection list.
//!
//! The store treats persistence as one named blob that is read and replaced
//! as a whole. [`PersistencePort`] is that boundary; the submodules provide
//! an in-memory map, a JSON file per key and a SQLite key-value table.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::platform;
use crate::types::collection::Collection;
use crate::types::errors::StorageError;
use crate::types::settings::{StorageBackend, StorageSettings};

pub mod json_file;
pub mod memory;
pub mod sqlite;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// Asynchronous get/set of a whole collection list under a key.
#[async_trait]
pub trait PersistencePort: Send + Sync {
    /// Returns the stored list, or `None` if nothing was ever stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Vec<Collection>>, StorageError>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, collections: &[Collection]) -> Result<(), StorageError>;
}

/// File name of the SQLite database inside the data directory.
pub const SQLITE_FILE_NAME: &str = "collections.db";

/// Resolves the data directory from settings, falling back to the platform default.
pub fn resolve_data_dir(settings: &StorageSettings) -> PathBuf {
    match &settings.data_dir {
        Some(dir) => PathBuf::from(dir),
        None => platform::get_data_dir(),
    }
}

/// Opens the backend selected in `settings`.
pub fn open_backend(settings: &StorageSettings) -> Result<Arc<dyn PersistencePort>, StorageError> {
    let backend: Arc<dyn PersistencePort> = match settings.backend {
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        StorageBackend::Json => Arc::new(JsonFileStorage::new(resolve_data_dir(settings))),
        StorageBackend::Sqlite => {
            Arc::new(SqliteStorage::open(resolve_data_dir(settings).join(SQLITE_FILE_NAME))?)
        }
    };
    log::debug!("opened {:?} storage backend", settings.backend);
    Ok(backend)
}
