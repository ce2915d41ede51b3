use thiserror::Error;

// === CollectionError ===

/// Errors returned by collection store operations.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// Another collection already uses this name (compared case-insensitively).
    #[error("Collection name already exists: {0}")]
    DuplicateName(String),
    /// Collection with the given ID was not found.
    #[error("Collection not found: {0}")]
    NotFound(String),
    /// The collection name is empty or whitespace only.
    #[error("Collection name cannot be empty")]
    EmptyName,
    /// Import input does not have the expected shape.
    #[error("Invalid import format: {0}")]
    InvalidFormat(String),
    /// There is nothing to export.
    #[error("No collections to export")]
    EmptyStore,
    /// An operation was attempted before `load()` completed.
    #[error("Collection store has not been loaded")]
    NotLoaded,
    /// The persistence backend failed.
    #[error("Storage failure: {0}")]
    Storage(#[from] StorageError),
    /// The browser tab source failed.
    #[error("Browser failure: {0}")]
    Browser(#[from] BrowserError),
}

impl CollectionError {
    /// True for failures of an external collaborator (persistence or browser).
    pub fn is_io_failure(&self) -> bool {
        matches!(self, CollectionError::Storage(_) | CollectionError::Browser(_))
    }
}

// === StorageError ===

/// Errors raised by persistence backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O error: {0}")]
    Io(String),
    /// The stored value could not be encoded or decoded.
    #[error("Storage serialization error: {0}")]
    Serialization(String),
    /// A database operation failed.
    #[error("Storage database error: {0}")]
    Database(String),
    /// The key cannot name a stored value.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}

// === BrowserError ===

/// Errors raised by a tab source.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// There is no current window to read tabs from.
    #[error("No browser window is open")]
    NoWindow,
    /// The referenced window does not exist.
    #[error("Window not found: {0}")]
    WindowNotFound(u64),
    /// The browser could not service the request.
    #[error("Browser unavailable: {0}")]
    Unavailable(String),
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}
