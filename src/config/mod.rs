// ABOUTME: Configuration management for fieldvisit
// Handles the signed-in role, guided tour timings, and UI preferences

use crate::models::Role;
use crate::tour::config::duration_millis;
use crate::tour::TourTimings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Visit permissions of the representative using this device
    #[serde(default)]
    pub role: Role,

    /// Guided tour debounces and measurement tolerances
    #[serde(default)]
    pub tour: TourTimings,

    /// UI preferences
    #[serde(default)]
    pub ui: UiPreferences,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiPreferences {
    /// Event loop tick; bounds how often animations and the tour advance
    #[serde(default = "default_tick_rate", with = "duration_millis")]
    pub tick_rate: Duration,

    /// Rows an animated scroll moves per tick
    #[serde(default = "default_scroll_step")]
    pub scroll_step: f32,
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            tick_rate: default_tick_rate(),
            scroll_step: default_scroll_step(),
        }
    }
}

fn default_tick_rate() -> Duration {
    Duration::from_millis(50)
}

fn default_scroll_step() -> f32 {
    2.0
}

impl AppConfig {
    /// Load from `~/.fieldvisit/config.toml`, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
        }
        let content = self.to_toml()?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// `~/.fieldvisit`, also home to the log directory
    pub fn data_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home_dir.join(".fieldvisit"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("config.toml"))
    }
}
