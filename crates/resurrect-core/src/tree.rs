//! Snapshot of kitty's window tree as returned by `kitty @ ls`.
//!
//! Only the fields needed to rebuild a session are modelled; everything else
//! in the payload (ids, titles, foreground process lists, ...) is ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DecodeError;

/// Ordered list of OS windows, one per kitty top-level window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerTree(pub Vec<OsWindow>);

impl ContainerTree {
    /// Parse the JSON emitted by `kitty @ ls`.
    pub fn from_json(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn roots(&self) -> &[OsWindow] {
        &self.0
    }

    /// The container a single-instance save operates on.
    pub fn first_root(&self) -> Option<&OsWindow> {
        self.0.first()
    }

    pub fn tab_count(&self) -> usize {
        self.0.iter().map(|root| root.tabs.len()).sum()
    }

    pub fn window_count(&self) -> usize {
        self.0
            .iter()
            .flat_map(|root| &root.tabs)
            .map(|tab| tab.windows.len())
            .sum()
    }
}

/// A root container owning an ordered list of tabs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsWindow {
    #[serde(default)]
    pub tabs: Vec<Tab>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    /// Opaque layout name, e.g. `tall`, `grid`, `stack`.
    #[serde(default)]
    pub layout: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub windows: Vec<Window>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// Pid of the shell kitty started for this window. `None` while the
    /// child has not been spawned yet.
    #[serde(default)]
    pub pid: Option<u32>,
    /// Empty when kitty could not determine it.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cwd: String,
    /// Environment captured at snapshot time.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl Window {
    /// The user's shell for this window, falling back to `bash`.
    pub fn shell(&self) -> &str {
        self.env.get("SHELL").map_or("bash", String::as_str)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
