//! RPC method handler for the JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches one call to the store, the window registry or
//! the settings engine and returns the JSON result.

use std::path::PathBuf;

use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::app::App;
use crate::managers::collection_store::CollectionStoreTrait;
use crate::services::export_service;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::collection::Tab;
use crate::types::errors::CollectionError;

/// Short machine-readable code for a store error.
pub fn error_code(err: &CollectionError) -> &'static str {
    match err {
        CollectionError::DuplicateName(_) => "duplicate_name",
        CollectionError::NotFound(_) => "not_found",
        CollectionError::EmptyName => "empty_name",
        CollectionError::InvalidFormat(_) => "invalid_format",
        CollectionError::EmptyStore => "empty_store",
        CollectionError::NotLoaded => "not_loaded",
        CollectionError::Storage(_) | CollectionError::Browser(_) => "io_failure",
    }
}

/// Formats a store error as `"<code>: <message>"`.
fn rpc_error(err: CollectionError) -> String {
    format!("{}: {}", error_code(&err), err)
}

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", name))
}

/// Explicit tabs from params, or `None` when the caller wants the current window.
fn tabs_param(params: &Value) -> Result<Option<Vec<Tab>>, String> {
    match params.get("tabs") {
        None | Some(Value::Null) => Ok(None),
        Some(v) => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|e| format!("invalid tabs: {}", e)),
    }
}

/// Dispatch a JSON-RPC method call.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Collections ───
        "collections.list" => {
            let a = app.lock().await;
            serde_json::to_value(a.store.collections()).map_err(|e| e.to_string())
        }
        "collections.get" => {
            let id = str_param(params, "id")?;
            let a = app.lock().await;
            let collection = a
                .store
                .get(id)
                .ok_or_else(|| rpc_error(CollectionError::NotFound(id.to_string())))?;
            serde_json::to_value(collection).map_err(|e| e.to_string())
        }
        "collections.create" => {
            let name = str_param(params, "name")?;
            let tabs = tabs_param(params)?;
            let mut a = app.lock().await;
            let created = match tabs {
                Some(tabs) => a.store.create(name, tabs).await,
                None => a.store.save_current_window(name).await,
            }
            .map_err(rpc_error)?;
            serde_json::to_value(created).map_err(|e| e.to_string())
        }
        "collections.save_window" => {
            let name = str_param(params, "name")?;
            let close = params.get("close").and_then(|v| v.as_bool()).unwrap_or(false);
            let mut a = app.lock().await;
            if close {
                let (created, window) = a
                    .store
                    .save_and_close_current_window(name)
                    .await
                    .map_err(rpc_error)?;
                Ok(json!({"collection": created, "window": window}))
            } else {
                let created = a.store.save_current_window(name).await.map_err(rpc_error)?;
                Ok(json!({"collection": created}))
            }
        }
        "collections.update" => {
            let id = str_param(params, "id")?;
            let tabs = tabs_param(params)?;
            let mut a = app.lock().await;
            let updated = match tabs {
                Some(tabs) => a.store.update(id, tabs).await,
                None => a.store.update_from_current_window(id).await,
            }
            .map_err(rpc_error)?;
            serde_json::to_value(updated).map_err(|e| e.to_string())
        }
        "collections.delete" => {
            let id = str_param(params, "id")?;
            let mut a = app.lock().await;
            let removed = a.store.remove(id).await.map_err(rpc_error)?;
            Ok(json!({"ok": true, "id": removed.id}))
        }
        "collections.reorder" => {
            let dragged = str_param(params, "dragged_id")?;
            let target = str_param(params, "target_id")?;
            let mut a = app.lock().await;
            let moved = a.store.reorder(dragged, target).await.map_err(rpc_error)?;
            let order: Vec<&str> = a.store.collections().iter().map(|c| c.id.as_str()).collect();
            Ok(json!({"moved": moved, "order": order}))
        }
        "collections.open" => {
            let id = str_param(params, "id")?;
            let a = app.lock().await;
            let window = a.store.open(id).await.map_err(rpc_error)?;
            Ok(json!({"window": window}))
        }
        "collections.export" => {
            let a = app.lock().await;
            let pretty = params
                .get("pretty")
                .and_then(|v| v.as_bool())
                .unwrap_or(a.settings_engine.get_settings().export.pretty);
            let to_file = params.get("to_file").and_then(|v| v.as_bool()).unwrap_or(false);
            let directory = params.get("directory").and_then(|v| v.as_str());

            if to_file || directory.is_some() {
                let dir = directory.map(PathBuf::from).unwrap_or_else(|| a.export_dir());
                let collections = a.store.export_all().map_err(rpc_error)?;
                let path = export_service::write_export(&dir, &collections, pretty)
                    .await
                    .map_err(rpc_error)?;
                Ok(json!({"path": path.to_string_lossy(), "count": collections.len()}))
            } else {
                let text = a.store.export_json(pretty).map_err(rpc_error)?;
                Ok(json!({
                    "file_name": export_service::default_export_file_name(),
                    "json": text,
                }))
            }
        }
        "collections.import" => {
            let mut a = app.lock().await;
            let added = if let Some(data) = params.get("data") {
                a.store.import_merge(data).await
            } else if let Some(text) = params.get("json").and_then(|v| v.as_str()) {
                a.store.import_json(text).await
            } else if let Some(path) = params.get("path").and_then(|v| v.as_str()) {
                let text = export_service::read_import(&PathBuf::from(path))
                    .await
                    .map_err(rpc_error)?;
                a.store.import_json(&text).await
            } else {
                return Err("missing data, json or path".to_string());
            }
            .map_err(rpc_error)?;
            Ok(json!({"added": added, "total": a.store.len()}))
        }

        // ─── Windows ───
        "window.sync" => {
            let tabs = tabs_param(params)?.ok_or("missing tabs")?;
            let a = app.lock().await;
            let window = a.browser.sync_current_window(tabs).map_err(|e| e.to_string())?;
            Ok(json!({"window": window}))
        }
        "window.list" => {
            let a = app.lock().await;
            serde_json::to_value(a.browser.windows()).map_err(|e| e.to_string())
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().await;
            serde_json::to_value(a.settings_engine.get_settings()).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = str_param(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().await;
            a.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
