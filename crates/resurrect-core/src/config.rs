//! Configuration values.
//!
//! These are plain data: nothing here reads files or the environment. The CLI
//! locates and parses the config file, then hands the relevant section to each
//! component explicitly.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default artifact directory, before `~` and `$VAR` expansion.
pub const DEFAULT_DIRECTORY: &str = "~/.i3/i3-resurrect/";

/// Top-level config file contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub directory: String,
    pub plugins: Plugins,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory: DEFAULT_DIRECTORY.to_string(),
            plugins: Plugins::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plugins {
    pub kitty: KittyConfig,
}

/// Settings scoped to the kitty integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KittyConfig {
    /// kitty's `listen_on` value. May contain `{kitty_pid}`.
    pub listen_socket: String,
    /// Process names eligible for relaunch when found under a window's shell.
    pub subprocesses: BTreeSet<String>,
    /// Upper bound on one remote-control round trip.
    pub request_timeout_ms: u64,
    /// Program (and leading arguments) used to reach kitty's remote-control
    /// channel, e.g. `["flatpak", "run", "net.kovidgoyal.kitty"]`.
    pub kitty_command: Vec<String>,
}

impl Default for KittyConfig {
    fn default() -> Self {
        Self {
            listen_socket: "unix:/tmp/kitty".to_string(),
            subprocesses: BTreeSet::new(),
            request_timeout_ms: 10_000,
            kitty_command: vec!["kitty".to_string()],
        }
    }
}

impl KittyConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
