mod load;
mod save;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

pub use load::{load_from, load_or_default};
pub use save::save_to;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Application paths muted while their window is in the background.
    #[serde(default)]
    pub background_mute_paths: BTreeSet<String>,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Show each session's process id next to its name.
    #[serde(default)]
    pub show_session_pid: bool,
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            background_mute_paths: BTreeSet::new(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            show_session_pid: false,
        }
    }
}

impl Settings {
    /// `<config dir>/mixer/settings.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("mixer").join("settings.toml"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] toml::de::Error),
}
