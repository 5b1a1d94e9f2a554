//! Application configuration
//!
//! Configuration loaded from `.gh-actions-manager.toml`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Parent directory for repository working copies
    #[serde(default = "default_clone_dir")]
    pub clone_dir: PathBuf,

    /// Suggested committer name for workflow edits
    #[serde(default)]
    pub git_user_name: Option<String>,

    /// Suggested committer email for workflow edits
    #[serde(default)]
    pub git_user_email: Option<String>,

    /// Character budget for one block of printed log output
    #[serde(default = "default_log_chunk_size")]
    pub log_chunk_size: usize,

    /// Events offered when editing a workflow trigger
    #[serde(default = "default_triggers")]
    pub triggers: Vec<String>,
}

fn default_clone_dir() -> PathBuf {
    env::temp_dir().join(crate::APP_NAME)
}

fn default_log_chunk_size() -> usize {
    3000
}

fn default_triggers() -> Vec<String> {
    ["push", "pull_request", "fork", "issues"]
        .iter()
        .map(|t| t.to_string())
        .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            clone_dir: default_clone_dir(),
            git_user_name: None,
            git_user_email: None,
            log_chunk_size: default_log_chunk_size(),
            triggers: default_triggers(),
        }
    }
}

impl AppConfig {
    /// Load config from an explicit path, or search the default locations
    ///
    /// A broken explicit file is an error. A broken discovered file is
    /// logged and replaced by the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match crate::load_config_file(explicit)? {
            Some((path, content)) => match Self::parse(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from {}", path.display());
                    Ok(config)
                }
                Err(e) if explicit.is_some() => {
                    Err(e.context(format!("Invalid config file: {}", path.display())))
                }
                Err(e) => {
                    log::warn!("Failed to parse config file {}: {:#}", path.display(), e);
                    Ok(Self::default())
                }
            },
            None => {
                log::debug!("Using default app config");
                Ok(Self::default())
            }
        }
    }

    /// Parse config from TOML text, filling in defaults
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse config")?;
        if config.triggers.is_empty() {
            anyhow::bail!("`triggers` must list at least one event");
        }
        Ok(config)
    }
}
