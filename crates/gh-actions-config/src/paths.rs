//! Configuration and cache directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/gh-actions-manager/`, `~/.cache/gh-actions-manager/`
//! - macOS: `~/Library/Application Support/gh-actions-manager/`, `~/Library/Caches/gh-actions-manager/`
//! - Windows: `%APPDATA%\gh-actions-manager\`, `%LOCALAPPDATA%\gh-actions-manager\`

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::APP_NAME;

/// Get the application config directory, creating it if needed
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the application cache directory, creating it if needed
///
/// Release builds write their log files here.
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get path to app config file inside the config directory
pub fn app_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}
