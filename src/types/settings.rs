use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::managers::collection_store::DEFAULT_STORAGE_KEY;

/// Top-level application settings container.
///
/// Missing sections or fields fall back to their defaults, so settings files
/// written by older versions still load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppSettings {
    pub storage: StorageSettings,
    pub export: ExportSettings,
    pub logging: LoggingSettings,
}

impl AppSettings {
    /// Checks values that deserialize fine but would break startup.
    pub fn validate(&self) -> Result<(), String> {
        if !is_valid_storage_key(&self.storage.key) {
            return Err(format!(
                "storage.key '{}' must be non-empty, use only letters, digits, '-', '_' or '.', and not start with '.'",
                self.storage.key
            ));
        }
        if log::LevelFilter::from_str(&self.logging.level).is_err() {
            return Err(format!(
                "logging.level '{}' must be one of off, error, warn, info, debug, trace",
                self.logging.level
            ));
        }
        Ok(())
    }
}

/// Which persistence backend holds the collection list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Json,
    Sqlite,
    Memory,
}

/// Returns true if `key` can name a persisted blob on every backend.
///
/// The JSON backend turns the key into a file name, so path separators and
/// leading dots are rejected.
pub fn is_valid_storage_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

/// Persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Overrides the platform data directory when set.
    pub data_dir: Option<String>,
    /// Name of the blob the collection list is stored under.
    pub key: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Json,
            data_dir: None,
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Export file settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportSettings {
    pub pretty: bool,
    pub directory: Option<String>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            pretty: true,
            directory: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
