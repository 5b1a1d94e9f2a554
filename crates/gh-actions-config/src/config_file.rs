//! Config file discovery

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory and the home directory
pub const CONFIG_FILE: &str = ".gh-actions-manager.toml";

/// Candidate config locations, highest precedence first
///
/// 1. `./.gh-actions-manager.toml`
/// 2. `<config dir>/gh-actions-manager/config.toml`
/// 3. `~/.gh-actions-manager.toml`
pub fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILE)];
    if let Ok(path) = crate::paths::app_config_path() {
        candidates.push(path);
    }
    if let Some(home) = std::env::var_os("HOME") {
        candidates.push(PathBuf::from(home).join(CONFIG_FILE));
    }
    candidates
}

/// Load config file content
///
/// An explicit path must exist and be readable. Without one, the first
/// readable candidate wins and `None` means no config file was found.
pub fn load_config_file(explicit: Option<&Path>) -> Result<Option<(PathBuf, String)>> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        log::debug!("Loaded config from {}", path.display());
        return Ok(Some((path.to_path_buf(), content)));
    }

    for path in config_candidates() {
        if let Ok(content) = std::fs::read_to_string(&path) {
            log::debug!("Loaded config from {}", path.display());
            return Ok(Some((path, content)));
        }
    }

    Ok(None)
}
