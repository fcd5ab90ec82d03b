//! Loading and saving the configuration file.
//!
//! The file is looked up at:
//! 1. `$CRYMAIL_CONFIG` (environment variable)
//! 2. `~/.config/crymail/config.toml` (Linux), or the platform config dir
//!
//! A missing file is not an error; the defaults are used instead.

use std::path::{Path, PathBuf};

use super::model::Config;
use crate::error::{Error, Result};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "CRYMAIL_CONFIG";

/// Determine the config file path (checking env var first, then standard dirs).
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    if let Some(env_path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(env_path));
    }
    dirs::config_dir().map(|d| d.join("crymail").join("config.toml"))
}

/// Loads the configuration from `path`, or the defaults if it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)?;
    let config = toml::from_str(&contents)?;
    tracing::info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Loads the configuration from the standard location.
///
/// # Errors
///
/// Returns an error if no location can be determined, or the file exists
/// but cannot be read or parsed.
pub fn load_config() -> Result<Config> {
    let path = config_file_path()
        .ok_or_else(|| Error::Config("Could not determine config file path".to_string()))?;
    load_config_from(&path)
}

/// Writes the configuration to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if serialization or any filesystem operation fails.
pub fn save_config_to(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    tracing::info!(path = %path.display(), "Saved config");
    Ok(())
}
