use serde::{Deserialize, Serialize};

/// A single tab captured from a browser window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tab {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "favIconUrl", default)]
    pub fav_icon_url: String,
}

impl Tab {
    /// Creates a tab with the given URL and title and no favicon.
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            fav_icon_url: String::new(),
        }
    }
}

/// A named, ordered snapshot of the tabs of one window.
///
/// Timestamps are Unix epoch milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    #[serde(default)]
    pub tabs: Vec<Tab>,
}

impl Collection {
    /// Key used for case-insensitive name comparisons.
    pub fn name_key(name: &str) -> String {
        name.to_lowercase()
    }

    /// Returns true if `name` collides with this collection's name, ignoring case.
    pub fn has_name(&self, name: &str) -> bool {
        Self::name_key(&self.name) == Self::name_key(name)
    }

    /// URLs of the tabs in display order.
    pub fn urls(&self) -> Vec<String> {
        self.tabs.iter().map(|t| t.url.clone()).collect()
    }
}
