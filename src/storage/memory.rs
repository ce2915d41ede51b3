use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::PersistencePort;
use crate::types::collection::Collection;
use crate::types::errors::StorageError;

/// Process-local storage. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Vec<Collection>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn key_count(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }
}

#[async_trait]
impl PersistencePort for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<Collection>>, StorageError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, collections: &[Collection]) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        entries.insert(key.to_string(), collections.to_vec());
        Ok(())
    }
}
