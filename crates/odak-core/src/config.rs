//! Configuration management for Odak tools

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Longest countdown a timer accepts, in minutes
pub const MAX_DURATION_MINUTES: u32 = 24 * 60;

/// Color scheme used by the terminal views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

/// Global Odak configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Countdown length a fresh timer starts with (minutes)
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: u32,

    /// Category id selected when the timer opens
    #[serde(default = "default_category")]
    pub default_category: String,

    /// Durations offered by the duration picker (minutes)
    #[serde(default = "default_duration_presets")]
    pub duration_presets: Vec<u32>,

    #[serde(default)]
    pub theme: ThemeMode,

    /// Overrides the platform data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn default_duration_minutes() -> u32 {
    25
}

fn default_category() -> String {
    "study".to_string()
}

fn default_duration_presets() -> Vec<u32> {
    vec![15, 25, 45, 60]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_duration_minutes: default_duration_minutes(),
            default_category: default_category(),
            duration_presets: default_duration_presets(),
            theme: ThemeMode::default(),
            data_dir: None,
        }
    }
}

impl Config {
    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Check the durations are ones a timer can run
    pub fn validate(&self) -> Result<()> {
        let in_range = |minutes: u32| (1..=MAX_DURATION_MINUTES).contains(&minutes);

        if !in_range(self.default_duration_minutes) {
            bail!(
                "default_duration_minutes must be between 1 and {}, got {}",
                MAX_DURATION_MINUTES,
                self.default_duration_minutes
            );
        }
        if let Some(bad) = self.duration_presets.iter().find(|m| !in_range(**m)) {
            bail!(
                "duration_presets entries must be between 1 and {}, got {}",
                MAX_DURATION_MINUTES,
                bad
            );
        }
        Ok(())
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}
