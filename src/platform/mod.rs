// Platform paths
// Per-OS locations of the settings file and the persisted collection data.
//
// - Linux:   $XDG_CONFIG_HOME/tab-collections, $XDG_DATA_HOME/tab-collections
//            (falling back to ~/.config and ~/.local/share)
// - macOS:   ~/Library/Application Support/TabCollections (config and data)
// - Windows: %APPDATA%/TabCollections (config and data)

use std::env;
use std::path::PathBuf;

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const APP_DIR: &str = "tab-collections";

#[cfg(any(target_os = "macos", target_os = "windows"))]
const APP_DIR: &str = "TabCollections";

#[cfg(not(target_os = "windows"))]
fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Uses `$var` when set, otherwise `$HOME/<fallback...>`.
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn xdg_dir(var: &str, fallback: &[&str]) -> PathBuf {
    match env::var(var) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => fallback.iter().fold(home_dir(), |p, part| p.join(part)),
    }
}

/// Returns the directory holding `settings.json`.
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        home_dir()
            .join("Library")
            .join("Application Support")
            .join(APP_DIR)
    }
    #[cfg(target_os = "windows")]
    {
        let appdata = env::var("APPDATA")
            .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
        PathBuf::from(appdata).join(APP_DIR)
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        xdg_dir("XDG_CONFIG_HOME", &[".config"]).join(APP_DIR)
    }
}

/// Returns the directory holding persisted collections.
pub fn get_data_dir() -> PathBuf {
    #[cfg(any(target_os = "macos", target_os = "windows"))]
    {
        get_config_dir()
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        xdg_dir("XDG_DATA_HOME", &[".local", "share"]).join(APP_DIR)
    }
}
