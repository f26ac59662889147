//! Application settings

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use cat_rigctl::RigConfig;
use cat_sync::SyncConfig;
use cat_websdr::WebDriverConfig;
use serde::{Deserialize, Serialize};

/// WebSDR page settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WebSdrSettings {
    /// Page to load
    pub url: String,
    /// Wait after loading before the page is scripted (ms)
    pub settle_ms: u64,
    /// Waterfall height in pixels
    pub waterfall_height: u32,
    /// Waterfall scroll speed
    pub waterfall_speed: u32,
}

impl Default for WebSdrSettings {
    fn default() -> Self {
        Self {
            url: "http://websdr.ewi.utwente.nl:8901/".to_string(),
            settle_ms: 3000,
            waterfall_height: 400,
            waterfall_speed: 2,
        }
    }
}

impl WebSdrSettings {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Radio connection
    pub radio: RigConfig,
    /// Start rigctld before syncing if it is not running
    pub start_daemon: bool,
    /// Browser session
    pub browser: WebDriverConfig,
    /// WebSDR page
    pub websdr: WebSdrSettings,
    /// Sync loop tuning
    pub sync: SyncConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            radio: RigConfig::default(),
            start_daemon: true,
            browser: WebDriverConfig::default(),
            websdr: WebSdrSettings::default(),
            sync: SyncConfig::default(),
        }
    }
}

impl Settings {
    /// Get the XDG config directory for websdrcat
    /// Uses $XDG_CONFIG_HOME/websdrcat, falls back to ~/.config/websdrcat
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("websdrcat"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("websdrcat"))
    }

    /// Get the default settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from `path`, or from the default location
    ///
    /// A missing file yields defaults. A file that exists but cannot be read
    /// or parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::settings_path) else {
            return Ok(Self::default());
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// Save settings to `path`, or to the default location
    ///
    /// Returns the path written.
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(Self::settings_path)
            .context("Could not determine settings path")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        Ok(path)
    }
}
