//! Tab collections RPC server: JSON-RPC over stdin/stdout for a browser host.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"collections.create", "params":{"name":"...","tabs":[...]}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Logs go to stderr; stdout carries only protocol lines.

use std::io::Write;
use std::time::Instant;

use serde_json::{json, Value};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;

use tab_collections::app::App;
use tab_collections::rpc_handler::handle_method;
use tab_collections::services::settings_engine::SettingsEngineTrait;

/// Environment variable overriding the settings file location.
const CONFIG_ENV: &str = "TAB_COLLECTIONS_CONFIG";

/// Simple rate limiter: max requests per one-second window.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn emit(line: &Value) {
    let mut stdout = std::io::stdout().lock();
    if writeln!(stdout, "{}", line).and_then(|_| stdout.flush()).is_err() {
        log::error!("failed to write response to stdout");
    }
}

#[tokio::main]
async fn main() {
    let config_path = std::env::var(CONFIG_ENV).ok();
    let mut app = match App::new(config_path) {
        Ok(app) => app,
        Err(e) => {
            env_logger::init();
            log::error!("failed to initialize: {}", e);
            std::process::exit(1);
        }
    };

    let level = app.settings_engine.get_settings().logging.level.clone();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = app.startup().await {
        log::error!("failed to load collections: {}", e);
        std::process::exit(1);
    }
    let app = Mutex::new(app);

    emit(&json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}));

    let mut rate_limiter = RateLimiter::new(200);
    let mut lines = BufReader::new(io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(l)) => l,
            Ok(None) => break,
            Err(e) => {
                log::error!("stdin read failed: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                emit(&json!({"id": null, "error": format!("parse error: {}", e)}));
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            log::warn!("rate limit exceeded");
            emit(&json!({"id": id, "error": "rate limit exceeded"}));
            continue;
        }

        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        log::debug!("rpc {}", method);
        let response = match handle_method(&app, method, &params).await {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => {
                log::warn!("rpc {} failed: {}", method, err);
                json!({"id": id, "error": err})
            }
        };
        emit(&response);
    }

    log::info!("stdin closed, shutting down");
}
