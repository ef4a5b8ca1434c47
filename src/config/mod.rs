//! Configuration module for cert-health
//!
//! Handles loading and managing configuration from TOML files.

pub mod settings;

pub use settings::{InspectionSettings, ProbeSettings, ServerSettings, Settings};

use crate::utils::ConfigError;
use std::path::Path;

/// Load settings from an explicit path, or from the default location
pub fn load_settings<P: AsRef<Path>>(path: Option<P>) -> Result<Settings, ConfigError> {
    match path {
        Some(path) => Settings::load_from_file(path),
        None => Settings::load_default(),
    }
}
