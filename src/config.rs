use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Tunables for playback and peer synchronization.
///
/// Every field has a default so a config file only needs the keys it
/// changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Seconds between host broadcasts
    pub broadcast_interval: f64,
    /// Seconds of silence before a process elects itself host
    pub discovery_window: f64,
    /// Seconds without a message before the host counts as lost
    pub timeout_seconds: f64,
    /// Drift below this is left uncorrected to avoid visible snapping
    pub sync_threshold: f32,
    /// Restart the whole session when the sweep completes
    pub loop_playback: bool,
    /// UDP broadcast port
    pub port: u16,
    /// Uniform scale applied to recorded positions
    pub position_scale: f32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            broadcast_interval: 0.1,
            discovery_window: 2.0,
            timeout_seconds: 1.0,
            sync_threshold: 0.3,
            loop_playback: true,
            port: 7777,
            position_scale: 1.0,
        }
    }
}

impl SyncConfig {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("arena-sync").join("config.json"))
    }

    /// Read a config file; missing keys fall back to defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Load from the user config directory if a file exists there,
    /// otherwise defaults. A malformed file logs and falls back.
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                match Self::load_from(&path) {
                    Ok(config) => return config,
                    Err(e) => warn!("ignoring bad config file: {e:#}"),
                }
            }
        }
        Self::default()
    }
}
