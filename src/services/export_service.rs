//! Export and import documents.
//!
//! An export document is a UTF-8 JSON array of collections. Import documents
//! share the shape but are untrusted: this module only checks the top level
//! and leaves per-item validation to the store.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tokio::fs;

use crate::types::collection::Collection;
use crate::types::errors::{CollectionError, StorageError};

/// File name for an export made on `date`: `tab-collections-YYYY-MM-DD.json`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("tab-collections-{}.json", date.format("%Y-%m-%d"))
}

/// Export file name for today's (UTC) date.
pub fn default_export_file_name() -> String {
    export_file_name(Utc::now().date_naive())
}

/// Serializes collections to an export document.
pub fn encode(collections: &[Collection], pretty: bool) -> Result<String, CollectionError> {
    let json = if pretty {
        serde_json::to_string_pretty(collections)
    } else {
        serde_json::to_string(collections)
    };
    json.map_err(|e| StorageError::Serialization(e.to_string()).into())
}

/// Parses an import document and returns its top-level items.
///
/// # Errors
/// `InvalidFormat` when the text is not JSON or the top-level value is not an array.
pub fn parse_import(text: &str) -> Result<Vec<Value>, CollectionError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| CollectionError::InvalidFormat(format!("not valid JSON: {}", e)))?;
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(CollectionError::InvalidFormat(
            "top-level value must be an array".to_string(),
        )),
    }
}

/// Writes an export document into `dir` under today's export file name.
/// Returns the path written.
pub async fn write_export(
    dir: &Path,
    collections: &[Collection],
    pretty: bool,
) -> Result<PathBuf, CollectionError> {
    let json = encode(collections, pretty)?;
    fs::create_dir_all(dir)
        .await
        .map_err(|e| StorageError::Io(format!("Failed to create export directory: {}", e)))?;

    let path = dir.join(default_export_file_name());
    fs::write(&path, json)
        .await
        .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
    log::info!("exported {} collections to {}", collections.len(), path.display());
    Ok(path)
}

/// Reads an import document from disk.
pub async fn read_import(path: &Path) -> Result<String, CollectionError> {
    let text = fs::read_to_string(path)
        .await
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    Ok(text)
}
