//! Collection Store.
//!
//! Implements `CollectionStoreTrait`: the ordered list of collections and
//! every mutation on it. Each mutation builds the next list, persists it as a
//! whole through the [`PersistencePort`], and only then replaces the
//! in-memory list, so a failed write leaves the store exactly as it was.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::browser::TabSource;
use crate::services::export_service;
use crate::storage::PersistencePort;
use crate::types::collection::{Collection, Tab};
use crate::types::errors::CollectionError;
use crate::types::window::WindowHandle;

/// Default key the collection list is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "tabCollections";

/// Trait defining collection store operations.
#[async_trait]
pub trait CollectionStoreTrait {
    async fn load(&mut self) -> Result<usize, CollectionError>;
    async fn create(&mut self, name: &str, tabs: Vec<Tab>) -> Result<Collection, CollectionError>;
    async fn update(&mut self, id: &str, tabs: Vec<Tab>) -> Result<Collection, CollectionError>;
    async fn remove(&mut self, id: &str) -> Result<Collection, CollectionError>;
    /// Moves `dragged_id` into the slot `target_id` occupied. Returns `false` for no-ops.
    async fn reorder(&mut self, dragged_id: &str, target_id: &str) -> Result<bool, CollectionError>;
    fn export_all(&self) -> Result<Vec<Collection>, CollectionError>;
    fn export_json(&self, pretty: bool) -> Result<String, CollectionError>;
    /// Merges untrusted candidates. Returns the number of collections added.
    async fn import_merge(&mut self, candidates: &Value) -> Result<usize, CollectionError>;
    async fn import_json(&mut self, text: &str) -> Result<usize, CollectionError>;
    async fn capture_current_window(&self) -> Result<Vec<Tab>, CollectionError>;
    async fn save_current_window(&mut self, name: &str) -> Result<Collection, CollectionError>;
    async fn update_from_current_window(&mut self, id: &str) -> Result<Collection, CollectionError>;
    async fn open(&self, id: &str) -> Result<WindowHandle, CollectionError>;
    async fn save_and_close_current_window(
        &mut self,
        name: &str,
    ) -> Result<(Collection, WindowHandle), CollectionError>;
}

/// An import candidate that passed validation.
struct Candidate {
    name: String,
    tabs: Vec<Tab>,
    created_at: Option<i64>,
    updated_at: Option<i64>,
}

/// Ordered collection list backed by a persistence port and a tab source.
pub struct CollectionStore {
    persistence: Arc<dyn PersistencePort>,
    tab_source: Arc<dyn TabSource>,
    key: String,
    collections: Vec<Collection>,
    loaded: bool,
}

impl CollectionStore {
    /// Creates a store persisting under [`DEFAULT_STORAGE_KEY`]. Call `load()` before use.
    pub fn new(persistence: Arc<dyn PersistencePort>, tab_source: Arc<dyn TabSource>) -> Self {
        Self::with_key(persistence, tab_source, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(
        persistence: Arc<dyn PersistencePort>,
        tab_source: Arc<dyn TabSource>,
        key: &str,
    ) -> Self {
        Self {
            persistence,
            tab_source,
            key: key.to_string(),
            collections: Vec::new(),
            loaded: false,
        }
    }

    /// Returns the current Unix timestamp in milliseconds.
    fn now() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Collections in display order.
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn get(&self, id: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.id == id)
    }

    /// Finds a collection by name, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.has_name(name))
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    fn ensure_loaded(&self) -> Result<(), CollectionError> {
        if self.loaded {
            Ok(())
        } else {
            Err(CollectionError::NotLoaded)
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.collections.iter().position(|c| c.id == id)
    }

    /// Persists `next` and, only if that succeeds, makes it the current list.
    async fn commit(&mut self, next: Vec<Collection>) -> Result<(), CollectionError> {
        if let Err(e) = self.persistence.set(&self.key, &next).await {
            log::warn!("failed to persist {} collections: {}", next.len(), e);
            return Err(e.into());
        }
        self.collections = next;
        Ok(())
    }

    /// Validates one untrusted import item.
    fn parse_candidate(value: &Value) -> Option<Candidate> {
        let name = value.get("name")?.as_str()?.trim();
        if name.is_empty() {
            return None;
        }
        let tabs = value
            .get("tabs")?
            .as_array()?
            .iter()
            .filter_map(Self::parse_tab)
            .collect();

        // updatedAt only means something relative to the createdAt it came with.
        let created_at = value.get("createdAt").and_then(Value::as_i64);
        let updated_at = created_at.and_then(|created| {
            value
                .get("updatedAt")
                .and_then(Value::as_i64)
                .filter(|updated| *updated >= created)
        });

        Some(Candidate {
            name: name.to_string(),
            tabs,
            created_at,
            updated_at,
        })
    }

    fn parse_tab(value: &Value) -> Option<Tab> {
        let text = |field: &str| {
            value
                .get(field)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Some(Tab {
            url: value.get("url")?.as_str()?.to_string(),
            title: text("title"),
            fav_icon_url: text("favIconUrl"),
        })
    }

    async fn merge_items(&mut self, items: &[Value]) -> Result<usize, CollectionError> {
        let mut taken: HashSet<String> = self
            .collections
            .iter()
            .map(|c| Collection::name_key(&c.name))
            .collect();
        let mut next = self.collections.clone();
        let mut added = 0;

        for (index, item) in items.iter().enumerate() {
            let Some(candidate) = Self::parse_candidate(item) else {
                log::warn!("skipping malformed import item at index {}", index);
                continue;
            };
            if !taken.insert(Collection::name_key(&candidate.name)) {
                log::info!("skipping import of '{}': name already in use", candidate.name);
                continue;
            }
            next.push(Collection {
                id: Self::new_id(),
                name: candidate.name,
                created_at: candidate.created_at.unwrap_or_else(Self::now),
                updated_at: candidate.updated_at,
                tabs: candidate.tabs,
            });
            added += 1;
        }

        if added > 0 {
            self.commit(next).await?;
        }
        log::info!("imported {} of {} collections", added, items.len());
        Ok(added)
    }
}

#[async_trait]
impl CollectionStoreTrait for CollectionStore {
    /// Loads the persisted list, starting empty when nothing was stored yet.
    async fn load(&mut self) -> Result<usize, CollectionError> {
        let stored = self.persistence.get(&self.key).await?;
        self.collections = stored.unwrap_or_default();
        self.loaded = true;
        log::debug!("loaded {} collections from '{}'", self.collections.len(), self.key);
        Ok(self.collections.len())
    }

    /// Creates a collection at the front of the list.
    async fn create(&mut self, name: &str, tabs: Vec<Tab>) -> Result<Collection, CollectionError> {
        self.ensure_loaded()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(CollectionError::EmptyName);
        }
        if self.find_by_name(name).is_some() {
            return Err(CollectionError::DuplicateName(name.to_string()));
        }

        let collection = Collection {
            id: Self::new_id(),
            name: name.to_string(),
            created_at: Self::now(),
            updated_at: None,
            tabs,
        };

        let mut next = Vec::with_capacity(self.collections.len() + 1);
        next.push(collection.clone());
        next.extend(self.collections.iter().cloned());
        self.commit(next).await?;

        log::info!(
            "created collection '{}' ({}) with {} tabs",
            collection.name,
            collection.id,
            collection.tabs.len()
        );
        Ok(collection)
    }

    /// Replaces the tabs of a collection and stamps `updated_at`.
    async fn update(&mut self, id: &str, tabs: Vec<Tab>) -> Result<Collection, CollectionError> {
        self.ensure_loaded()?;
        let idx = self
            .position(id)
            .ok_or_else(|| CollectionError::NotFound(id.to_string()))?;

        let mut next = self.collections.clone();
        next[idx].tabs = tabs;
        next[idx].updated_at = Some(Self::now());
        let updated = next[idx].clone();
        self.commit(next).await?;

        log::info!("updated collection '{}' ({})", updated.name, updated.id);
        Ok(updated)
    }

    /// Removes a collection. There is no tombstone.
    async fn remove(&mut self, id: &str) -> Result<Collection, CollectionError> {
        self.ensure_loaded()?;
        let idx = self
            .position(id)
            .ok_or_else(|| CollectionError::NotFound(id.to_string()))?;

        let mut next = self.collections.clone();
        let removed = next.remove(idx);
        self.commit(next).await?;

        log::info!("removed collection '{}' ({})", removed.name, removed.id);
        Ok(removed)
    }

    /// The target index is taken before the dragged item is removed, so a
    /// backward move lands before the target and a forward move after it.
    async fn reorder(&mut self, dragged_id: &str, target_id: &str) -> Result<bool, CollectionError> {
        self.ensure_loaded()?;
        if dragged_id == target_id {
            return Ok(false);
        }
        let (Some(from), Some(to)) = (self.position(dragged_id), self.position(target_id)) else {
            return Ok(false);
        };

        let mut next = self.collections.clone();
        let dragged = next.remove(from);
        next.insert(to, dragged);
        self.commit(next).await?;

        log::info!("moved collection {} from {} to {}", dragged_id, from, to);
        Ok(true)
    }

    fn export_all(&self) -> Result<Vec<Collection>, CollectionError> {
        self.ensure_loaded()?;
        if self.collections.is_empty() {
            return Err(CollectionError::EmptyStore);
        }
        Ok(self.collections.clone())
    }

    fn export_json(&self, pretty: bool) -> Result<String, CollectionError> {
        let collections = self.export_all()?;
        export_service::encode(&collections, pretty)
    }

    /// Appends every valid, non-colliding candidate with a fresh id.
    /// Persists once for the whole batch, and not at all when nothing is added.
    async fn import_merge(&mut self, candidates: &Value) -> Result<usize, CollectionError> {
        self.ensure_loaded()?;
        let items = candidates.as_array().ok_or_else(|| {
            CollectionError::InvalidFormat("top-level value must be an array".to_string())
        })?;
        self.merge_items(items).await
    }

    async fn import_json(&mut self, text: &str) -> Result<usize, CollectionError> {
        self.ensure_loaded()?;
        let items = export_service::parse_import(text)?;
        self.merge_items(&items).await
    }

    async fn capture_current_window(&self) -> Result<Vec<Tab>, CollectionError> {
        let tabs = self.tab_source.list_current_window_tabs().await?;
        log::debug!("captured {} tabs from the current window", tabs.len());
        Ok(tabs)
    }

    async fn save_current_window(&mut self, name: &str) -> Result<Collection, CollectionError> {
        self.ensure_loaded()?;
        let tabs = self.capture_current_window().await?;
        self.create(name, tabs).await
    }

    async fn update_from_current_window(&mut self, id: &str) -> Result<Collection, CollectionError> {
        self.ensure_loaded()?;
        if self.position(id).is_none() {
            return Err(CollectionError::NotFound(id.to_string()));
        }
        let tabs = self.capture_current_window().await?;
        self.update(id, tabs).await
    }

    /// Opens the collection in a new window. An empty collection opens an empty window.
    async fn open(&self, id: &str) -> Result<WindowHandle, CollectionError> {
        self.ensure_loaded()?;
        let collection = self
            .get(id)
            .ok_or_else(|| CollectionError::NotFound(id.to_string()))?;

        let handle = if collection.tabs.is_empty() {
            self.tab_source.open_empty_window().await?
        } else {
            self.tab_source.open_window(&collection.urls()).await?
        };
        log::info!("opened collection '{}' in window {}", collection.name, handle.0);
        Ok(handle)
    }

    /// Saves the current window, then replaces it with an empty window so the
    /// browser never ends up without one. The collection stays saved if the
    /// window shuffle fails.
    async fn save_and_close_current_window(
        &mut self,
        name: &str,
    ) -> Result<(Collection, WindowHandle), CollectionError> {
        self.ensure_loaded()?;
        let source_window = self.tab_source.current_window().await?;
        let collection = self.save_current_window(name).await?;

        let replacement = self.tab_source.open_empty_window().await?;
        self.tab_source.close_window(source_window).await?;
        log::debug!(
            "closed window {} after saving '{}'",
            source_window.0,
            collection.name
        );
        Ok((collection, replacement))
    }
}
