//! Tab collections: save the tabs of a browser window as a named collection,
//! reopen it later, keep it up to date, reorder, delete, and exchange
//! collections as JSON files.
//!
//! This library crate exposes all modules for use by the RPC binary and integration tests.

pub mod app;
pub mod browser;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod storage;
pub mod types;
