//! Odak Core - Shared functionality for Odak tools
//!
//! Standard paths, the JSON configuration file, and the time formatting
//! helpers every view uses.

pub mod config;
pub mod format;
pub mod paths;

pub use config::{Config, ThemeMode};
pub use paths::Paths;
