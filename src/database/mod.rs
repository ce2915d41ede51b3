//! SQLite database layer backing [`crate::storage::SqliteStorage`].
//!
//! # Usage
//!
//! ```no_run
//! use tab_collections::database::Database;
//!
//! let db = Database::open("collections.db").expect("failed to open database");
//! assert_eq!(db.schema_version(), tab_collections::database::migrations::CURRENT_SCHEMA_VERSION);
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
