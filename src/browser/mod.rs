//! Browser boundary: reading the tabs of the current window and opening or
//! closing windows.

use async_trait::async_trait;

use crate::types::collection::Tab;
use crate::types::errors::BrowserError;
use crate::types::window::WindowHandle;

pub mod memory;

pub use memory::InMemoryBrowser;

/// Asynchronous access to the browser's windows.
#[async_trait]
pub trait TabSource: Send + Sync {
    /// Handle of the window the user is acting from.
    async fn current_window(&self) -> Result<WindowHandle, BrowserError>;

    /// Tabs of the current window, in tab-strip order.
    async fn list_current_window_tabs(&self) -> Result<Vec<Tab>, BrowserError>;

    /// Opens one new window with one tab per URL, preserving order.
    async fn open_window(&self, urls: &[String]) -> Result<WindowHandle, BrowserError>;

    /// Opens a new window with no pages loaded.
    async fn open_empty_window(&self) -> Result<WindowHandle, BrowserError>;

    async fn close_window(&self, handle: WindowHandle) -> Result<(), BrowserError>;
}
