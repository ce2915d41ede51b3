//! Unit tests for the in-memory window registry.

use tab_collections::browser::memory::EMPTY_WINDOW_URL;
use tab_collections::browser::{InMemoryBrowser, TabSource};
use tab_collections::types::collection::Tab;
use tab_collections::types::errors::BrowserError;
use tab_collections::types::window::WindowHandle;

#[tokio::test]
async fn test_new_browser_has_no_window() {
    let browser = InMemoryBrowser::new();
    assert!(matches!(browser.current_window().await, Err(BrowserError::NoWindow)));
    assert!(matches!(
        browser.list_current_window_tabs().await,
        Err(BrowserError::NoWindow)
    ));
    assert_eq!(browser.window_count(), 0);
}

#[tokio::test]
async fn test_with_window_lists_tabs_in_order() {
    let browser = InMemoryBrowser::with_window(vec![
        Tab::new("https://a.io", "A"),
        Tab::new("https://b.io", "B"),
    ]);
    let tabs = browser.list_current_window_tabs().await.unwrap();
    let urls: Vec<&str> = tabs.iter().map(|t| t.url.as_str()).collect();
    assert_eq!(urls, vec!["https://a.io", "https://b.io"]);
}

#[tokio::test]
async fn test_open_window_focuses_new_window() {
    let browser = InMemoryBrowser::with_window(vec![Tab::new("https://a.io", "A")]);
    let urls = vec!["https://x.io".to_string(), "https://y.io".to_string()];
    let handle = browser.open_window(&urls).await.unwrap();

    assert_eq!(browser.current_window().await.unwrap(), handle);
    let tabs = browser.list_current_window_tabs().await.unwrap();
    assert_eq!(tabs.len(), 2);
    assert_eq!(tabs[1].url, "https://y.io");
    assert_eq!(browser.window_count(), 2);
}

#[tokio::test]
async fn test_open_empty_window_has_blank_tab() {
    let browser = InMemoryBrowser::new();
    let handle = browser.open_empty_window().await.unwrap();
    let windows = browser.windows();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].handle, handle);
    assert!(windows[0].focused);
    assert_eq!(windows[0].tabs[0].url, EMPTY_WINDOW_URL);
}

#[tokio::test]
async fn test_close_focused_window_moves_focus() {
    let browser = InMemoryBrowser::new();
    let first = browser.open_empty_window().await.unwrap();
    let second = browser.open_empty_window().await.unwrap();

    browser.close_window(second).await.unwrap();
    assert_eq!(browser.current_window().await.unwrap(), first);

    browser.close_window(first).await.unwrap();
    assert!(matches!(browser.current_window().await, Err(BrowserError::NoWindow)));
}

#[tokio::test]
async fn test_close_unknown_window_fails() {
    let browser = InMemoryBrowser::new();
    let err = browser.close_window(WindowHandle(99)).await.unwrap_err();
    assert!(matches!(err, BrowserError::WindowNotFound(99)));
}

#[tokio::test]
async fn test_sync_current_window_replaces_or_opens() {
    let browser = InMemoryBrowser::new();
    let opened = browser
        .sync_current_window(vec![Tab::new("https://one.io", "One")])
        .unwrap();
    let replaced = browser
        .sync_current_window(vec![Tab::new("https://two.io", "Two")])
        .unwrap();
    assert_eq!(opened, replaced);
    assert_eq!(browser.window_count(), 1);
    assert_eq!(browser.list_current_window_tabs().await.unwrap()[0].url, "https://two.io");
}

#[tokio::test]
async fn test_focus_switches_current_window() {
    let browser = InMemoryBrowser::new();
    let first = browser.open_empty_window().await.unwrap();
    let _second = browser.open_empty_window().await.unwrap();

    browser.focus(first).unwrap();
    assert_eq!(browser.current_window().await.unwrap(), first);
    assert!(browser.focus(WindowHandle(1234)).is_err());
}
