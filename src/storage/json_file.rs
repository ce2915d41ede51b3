//! JSON file storage: one `<key>.json` file per key inside a data directory.
//!
//! Writes go to a temporary sibling file first and are renamed into place,
//! so a crash mid-write never leaves a truncated list behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::PersistencePort;
use crate::types::collection::Collection;
use crate::types::errors::StorageError;
use crate::types::settings::is_valid_storage_key;

pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Directory holding the JSON files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if !is_valid_storage_key(key) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl PersistencePort for JsonFileStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<Collection>>, StorageError> {
        let path = self.path_for(key)?;
        let content = match fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::Io(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let collections = serde_json::from_str(&content).map_err(|e| {
            StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        Ok(Some(collections))
    }

    async fn set(&self, key: &str, collections: &[Collection]) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp_path = path.with_extension("json.tmp");

        fs::create_dir_all(&self.dir).await.map_err(|e| {
            StorageError::Io(format!("Failed to create data directory: {}", e))
        })?;

        let json = serde_json::to_string_pretty(collections)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        fs::write(&tmp_path, json)
            .await
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", tmp_path.display(), e)))?;
        if let Err(e) = fs::rename(&tmp_path, &path).await {
            if let Err(cleanup) = fs::remove_file(&tmp_path).await {
                log::warn!("failed to remove {}: {}", tmp_path.display(), cleanup);
            }
            return Err(StorageError::Io(format!(
                "Failed to replace {}: {}",
                path.display(),
                e
            )));
        }

        Ok(())
    }
}
