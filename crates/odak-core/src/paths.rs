//! Standard paths used by Odak tools

use std::path::{Path, PathBuf};

/// Standard Odak paths
pub struct Paths {
    /// Data directory (~/.local/share/odak)
    pub data: PathBuf,
    /// Config directory (~/.config/odak)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let data = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("odak");

        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("odak");

        Self { data, config }
    }

    /// Use `data` instead of the platform data directory
    pub fn with_data_dir(mut self, data: &Path) -> Self {
        self.data = data.to_path_buf();
        self
    }

    /// Get state directory for a tool
    pub fn state(&self, tool: &str) -> PathBuf {
        self.data.join(tool)
    }

    /// Path of the shared configuration file
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.json")
    }
}
