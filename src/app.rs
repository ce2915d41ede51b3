//! App Core.
//!
//! Wires settings, the selected persistence backend, the browser window
//! registry and the collection store together.

use std::path::PathBuf;
use std::sync::Arc;

use crate::browser::InMemoryBrowser;
use crate::managers::collection_store::{CollectionStore, CollectionStoreTrait};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::storage::{self, PersistencePort};
use crate::types::errors::CollectionError;

/// Central application struct holding the store and its collaborators.
pub struct App {
    pub settings_engine: SettingsEngine,
    pub browser: Arc<InMemoryBrowser>,
    pub store: CollectionStore,
}

impl App {
    /// Loads settings from `config_path` (or the platform default) and opens
    /// the configured backend. Call [`App::startup`] before using the store.
    pub fn new(config_path: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings_engine = SettingsEngine::new(config_path);
        let settings = settings_engine.load()?;

        let persistence = storage::open_backend(&settings.storage)?;
        Ok(Self::with_parts(
            settings_engine,
            persistence,
            Arc::new(InMemoryBrowser::new()),
        ))
    }

    /// Builds an app from explicit parts. The storage key comes from the engine's settings.
    pub fn with_parts(
        settings_engine: SettingsEngine,
        persistence: Arc<dyn PersistencePort>,
        browser: Arc<InMemoryBrowser>,
    ) -> Self {
        let key = settings_engine.get_settings().storage.key.clone();
        let store = CollectionStore::with_key(persistence, browser.clone(), &key);
        Self {
            settings_engine,
            browser,
            store,
        }
    }

    /// Startup sequence: load the persisted collections.
    pub async fn startup(&mut self) -> Result<usize, CollectionError> {
        let count = self.store.load().await?;
        log::info!("startup complete, {} collections available", count);
        Ok(count)
    }

    /// Directory exports are written to when no directory is given.
    pub fn export_dir(&self) -> PathBuf {
        let settings = self.settings_engine.get_settings();
        match &settings.export.directory {
            Some(dir) => PathBuf::from(dir),
            None => storage::resolve_data_dir(&settings.storage),
        }
    }
}
