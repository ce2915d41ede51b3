//! Unit tests for the RPC handler.
//!
//! These tests exercise the JSON-RPC methods through the same code path used
//! by the real `tab-collections-rpc` binary, with settings and data kept in a
//! temporary directory.

use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::sync::Mutex;

use tab_collections::app::App;
use tab_collections::rpc_handler::handle_method;

/// Create a started App whose settings and JSON data live in a temp directory.
async fn setup() -> (Mutex<App>, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let config_path = tmp.path().join("settings.json");
    let data_dir = tmp.path().join("data");
    std::fs::write(
        &config_path,
        json!({
            "storage": {"backend": "json", "data_dir": data_dir, "key": "tabCollections"},
            "export": {"pretty": true, "directory": null},
            "logging": {"level": "info"}
        })
        .to_string(),
    )
    .unwrap();

    let mut app = App::new(Some(config_path.to_string_lossy().to_string())).expect("Failed to init App");
    app.startup().await.expect("Failed to load collections");
    (Mutex::new(app), tmp)
}

async fn call(app: &Mutex<App>, method: &str, params: Value) -> Value {
    handle_method(app, method, &params)
        .await
        .unwrap_or_else(|e| panic!("{} failed: {}", method, e))
}

async fn create(app: &Mutex<App>, name: &str) -> String {
    let res = call(
        app,
        "collections.create",
        json!({"name": name, "tabs": [{"url": format!("https://{}.io", name.to_lowercase()), "title": name}]}),
    )
    .await;
    res["id"].as_str().unwrap().to_string()
}

// ─── Basics ───

#[tokio::test]
async fn test_ping() {
    let (app, _tmp) = setup().await;
    assert_eq!(call(&app, "ping", json!({})).await, json!({"pong": true}));
}

#[tokio::test]
async fn test_unknown_method_returns_error() {
    let (app, _tmp) = setup().await;
    let res = handle_method(&app, "nonexistent.method", &json!({})).await;
    assert!(res.unwrap_err().contains("unknown method"));
}

#[tokio::test]
async fn test_missing_params_are_reported() {
    let (app, _tmp) = setup().await;
    let err = handle_method(&app, "collections.delete", &json!({})).await.unwrap_err();
    assert_eq!(err, "missing id");
}

// ─── Collections ───

#[tokio::test]
async fn test_create_and_list() {
    let (app, _tmp) = setup().await;
    create(&app, "Work").await;
    create(&app, "Home").await;

    let list = call(&app, "collections.list", json!({})).await;
    let arr = list.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["name"], "Home");
    assert_eq!(arr[1]["name"], "Work");
    assert_eq!(arr[1]["tabs"][0]["url"], "https://work.io");
}

#[tokio::test]
async fn test_duplicate_create_has_error_code() {
    let (app, _tmp) = setup().await;
    create(&app, "Work").await;
    let err = handle_method(&app, "collections.create", &json!({"name": "work", "tabs": []}))
        .await
        .unwrap_err();
    assert!(err.starts_with("duplicate_name:"), "{}", err);
}

#[tokio::test]
async fn test_create_without_tabs_uses_synced_window() {
    let (app, _tmp) = setup().await;
    call(
        &app,
        "window.sync",
        json!({"tabs": [{"url": "https://synced.io", "title": "Synced", "favIconUrl": ""}]}),
    )
    .await;

    let created = call(&app, "collections.create", json!({"name": "Snapshot"})).await;
    assert_eq!(created["tabs"][0]["url"], "https://synced.io");
}

#[tokio::test]
async fn test_create_without_tabs_and_no_window_is_io_failure() {
    let (app, _tmp) = setup().await;
    let err = handle_method(&app, "collections.create", &json!({"name": "Nothing"}))
        .await
        .unwrap_err();
    assert!(err.starts_with("io_failure:"), "{}", err);
}

#[tokio::test]
async fn test_get_update_delete() {
    let (app, _tmp) = setup().await;
    let id = create(&app, "Docs").await;

    let got = call(&app, "collections.get", json!({"id": id})).await;
    assert_eq!(got["name"], "Docs");
    assert!(got.get("updatedAt").is_none());

    let updated = call(
        &app,
        "collections.update",
        json!({"id": id, "tabs": [{"url": "https://docs.rs"}]}),
    )
    .await;
    assert_eq!(updated["tabs"][0]["url"], "https://docs.rs");
    assert!(updated["updatedAt"].is_i64());

    let deleted = call(&app, "collections.delete", json!({"id": id})).await;
    assert_eq!(deleted["ok"], true);

    let err = handle_method(&app, "collections.get", &json!({"id": id})).await.unwrap_err();
    assert!(err.starts_with("not_found:"));
}

#[tokio::test]
async fn test_reorder_returns_new_order() {
    let (app, _tmp) = setup().await;
    let c = create(&app, "C").await;
    let b = create(&app, "B").await;
    let a = create(&app, "A").await;

    let res = call(
        &app,
        "collections.reorder",
        json!({"dragged_id": a, "target_id": c}),
    )
    .await;
    assert_eq!(res["moved"], true);
    assert_eq!(res["order"], json!([b, c, a]));

    let res = call(
        &app,
        "collections.reorder",
        json!({"dragged_id": a, "target_id": a}),
    )
    .await;
    assert_eq!(res["moved"], false);
}

#[tokio::test]
async fn test_save_window_with_close() {
    let (app, _tmp) = setup().await;
    call(&app, "window.sync", json!({"tabs": [{"url": "https://a.io"}]})).await;

    let res = call(&app, "collections.save_window", json!({"name": "Closing", "close": true})).await;
    assert_eq!(res["collection"]["name"], "Closing");

    let windows = call(&app, "window.list", json!({})).await;
    let windows = windows.as_array().unwrap();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0]["handle"], res["window"]);
    assert_eq!(windows[0]["focused"], true);
}

#[tokio::test]
async fn test_open_collection_opens_window() {
    let (app, _tmp) = setup().await;
    let id = create(&app, "Trip").await;

    let res = call(&app, "collections.open", json!({"id": id})).await;
    let windows = call(&app, "window.list", json!({})).await;
    let opened = windows
        .as_array()
        .unwrap()
        .iter()
        .find(|w| w["handle"] == res["window"])
        .unwrap();
    assert_eq!(opened["tabs"][0]["url"], "https://trip.io");
}

// ─── Export / import ───

#[tokio::test]
async fn test_export_empty_store_fails() {
    let (app, _tmp) = setup().await;
    let err = handle_method(&app, "collections.export", &json!({})).await.unwrap_err();
    assert!(err.starts_with("empty_store:"));
}

#[tokio::test]
async fn test_export_inline_and_reimport() {
    let (app, _tmp) = setup().await;
    create(&app, "One").await;
    create(&app, "Two").await;

    let exported = call(&app, "collections.export", json!({"pretty": false})).await;
    assert!(exported["file_name"].as_str().unwrap().starts_with("tab-collections-"));
    let text = exported["json"].as_str().unwrap().to_string();

    // Everything collides with itself.
    let res = call(&app, "collections.import", json!({"json": text})).await;
    assert_eq!(res["added"], 0);
    assert_eq!(res["total"], 2);

    let res = call(
        &app,
        "collections.import",
        json!({"data": [{"name": "Three", "tabs": []}, {"name": "one", "tabs": []}]}),
    )
    .await;
    assert_eq!(res["added"], 1);
    assert_eq!(res["total"], 3);
}

#[tokio::test]
async fn test_export_to_directory_and_import_from_path() {
    let (app, tmp) = setup().await;
    create(&app, "Saved").await;

    let out_dir = tmp.path().join("exports");
    let res = call(
        &app,
        "collections.export",
        json!({"directory": out_dir.to_string_lossy()}),
    )
    .await;
    let path = res["path"].as_str().unwrap().to_string();
    assert_eq!(res["count"], 1);

    let list = call(&app, "collections.list", json!({})).await;
    call(&app, "collections.delete", json!({"id": list[0]["id"]})).await;
    let res = call(&app, "collections.import", json!({"path": path})).await;
    assert_eq!(res["added"], 1);
}

#[tokio::test]
async fn test_import_rejects_non_array() {
    let (app, _tmp) = setup().await;
    let err = handle_method(&app, "collections.import", &json!({"data": {"name": "x"}}))
        .await
        .unwrap_err();
    assert!(err.starts_with("invalid_format:"));

    let err = handle_method(&app, "collections.import", &json!({})).await.unwrap_err();
    assert_eq!(err, "missing data, json or path");
}

// ─── Persistence ───

#[tokio::test]
async fn test_collections_survive_app_restart() {
    let (app, tmp) = setup().await;
    create(&app, "Durable").await;
    drop(app);

    let config_path = tmp.path().join("settings.json");
    let mut app = App::new(Some(config_path.to_string_lossy().to_string())).unwrap();
    assert_eq!(app.startup().await.unwrap(), 1);
    assert_eq!(app.store.collections()[0].name, "Durable");
}

// ─── Settings ───

#[tokio::test]
async fn test_settings_get_and_set() {
    let (app, _tmp) = setup().await;
    call(&app, "settings.set", json!({"key": "export.pretty", "value": false})).await;
    let settings = call(&app, "settings.get", json!({})).await;
    assert_eq!(settings["export"]["pretty"], false);
    assert_eq!(settings["storage"]["backend"], "json");

    let err = handle_method(&app, "settings.set", &json!({"key": "export.pretty"}))
        .await
        .unwrap_err();
    assert_eq!(err, "missing value");
}

#[tokio::test]
async fn test_settings_set_rejects_unusable_key() {
    let (app, _tmp) = setup().await;
    let err = handle_method(&app, "settings.set", &json!({"key": "storage.key", "value": ""}))
        .await
        .unwrap_err();
    assert!(err.starts_with("Invalid settings value"), "{}", err);

    let settings = call(&app, "settings.get", json!({})).await;
    assert_eq!(settings["storage"]["key"], "tabCollections");
}
