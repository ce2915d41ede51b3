//! In-memory window registry implementing [`TabSource`].
//!
//! The RPC host mirrors its real window into this registry with
//! [`InMemoryBrowser::sync_current_window`] and reads back the windows the
//! store asked to open via [`InMemoryBrowser::windows`].

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::TabSource;
use crate::types::collection::Tab;
use crate::types::errors::BrowserError;
use crate::types::window::{WindowHandle, WindowSnapshot};

/// URL given to the single tab of an empty window.
pub const EMPTY_WINDOW_URL: &str = "about:blank";

struct Window {
    handle: WindowHandle,
    tabs: Vec<Tab>,
}

#[derive(Default)]
struct BrowserState {
    windows: Vec<Window>,
    focused: Option<WindowHandle>,
    next_handle: u64,
}

impl BrowserState {
    fn add_window(&mut self, tabs: Vec<Tab>) -> WindowHandle {
        self.next_handle += 1;
        let handle = WindowHandle(self.next_handle);
        self.windows.push(Window { handle, tabs });
        self.focused = Some(handle);
        handle
    }

    fn position(&self, handle: WindowHandle) -> Option<usize> {
        self.windows.iter().position(|w| w.handle == handle)
    }
}

/// Window registry with a single focused ("current") window.
#[derive(Default)]
pub struct InMemoryBrowser {
    state: Mutex<BrowserState>,
}

impl InMemoryBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a browser with one focused window holding `tabs`.
    pub fn with_window(tabs: Vec<Tab>) -> Self {
        let browser = Self::new();
        if let Ok(mut state) = browser.state.lock() {
            state.add_window(tabs);
        }
        browser
    }

    fn lock(&self) -> Result<MutexGuard<'_, BrowserState>, BrowserError> {
        self.state
            .lock()
            .map_err(|e| BrowserError::Unavailable(e.to_string()))
    }

    /// Replaces the tabs of the focused window, opening one if none exists.
    pub fn sync_current_window(&self, tabs: Vec<Tab>) -> Result<WindowHandle, BrowserError> {
        let mut state = self.lock()?;
        let focused = state.focused.and_then(|h| state.position(h));
        match focused {
            Some(idx) => {
                state.windows[idx].tabs = tabs;
                Ok(state.windows[idx].handle)
            }
            None => Ok(state.add_window(tabs)),
        }
    }

    /// Makes `handle` the current window.
    pub fn focus(&self, handle: WindowHandle) -> Result<(), BrowserError> {
        let mut state = self.lock()?;
        if state.position(handle).is_none() {
            return Err(BrowserError::WindowNotFound(handle.0));
        }
        state.focused = Some(handle);
        Ok(())
    }

    /// Snapshot of all open windows in opening order.
    pub fn windows(&self) -> Vec<WindowSnapshot> {
        match self.state.lock() {
            Ok(state) => state
                .windows
                .iter()
                .map(|w| WindowSnapshot {
                    handle: w.handle,
                    focused: state.focused == Some(w.handle),
                    tabs: w.tabs.clone(),
                })
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn window_count(&self) -> usize {
        self.state.lock().map(|s| s.windows.len()).unwrap_or(0)
    }
}

#[async_trait]
impl TabSource for InMemoryBrowser {
    async fn current_window(&self) -> Result<WindowHandle, BrowserError> {
        self.lock()?.focused.ok_or(BrowserError::NoWindow)
    }

    async fn list_current_window_tabs(&self) -> Result<Vec<Tab>, BrowserError> {
        let state = self.lock()?;
        let idx = state
            .focused
            .and_then(|h| state.position(h))
            .ok_or(BrowserError::NoWindow)?;
        Ok(state.windows[idx].tabs.clone())
    }

    async fn open_window(&self, urls: &[String]) -> Result<WindowHandle, BrowserError> {
        let tabs = urls.iter().map(|u| Tab::new(u.as_str(), u.as_str())).collect();
        Ok(self.lock()?.add_window(tabs))
    }

    async fn open_empty_window(&self) -> Result<WindowHandle, BrowserError> {
        Ok(self.lock()?.add_window(vec![Tab::new(EMPTY_WINDOW_URL, "New Tab")]))
    }

    async fn close_window(&self, handle: WindowHandle) -> Result<(), BrowserError> {
        let mut state = self.lock()?;
        let idx = state
            .position(handle)
            .ok_or(BrowserError::WindowNotFound(handle.0))?;
        state.windows.remove(idx);

        // Focus falls back to the most recently opened remaining window
        if state.focused == Some(handle) {
            state.focused = state.windows.last().map(|w| w.handle);
        }
        Ok(())
    }
}
