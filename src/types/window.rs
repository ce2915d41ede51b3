use serde::{Deserialize, Serialize};

use super::collection::Tab;

/// Opaque identifier of a browser window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct WindowHandle(pub u64);

/// A window and its tabs as known to a tab source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowSnapshot {
    pub handle: WindowHandle,
    pub focused: bool,
    pub tabs: Vec<Tab>,
}
