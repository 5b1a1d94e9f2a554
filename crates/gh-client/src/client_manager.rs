//! Token resolution and client construction
//!
//! Resolves a GitHub token from the environment or the `gh` CLI and builds an
//! authenticated `OctocrabClient` for github.com or a GitHub Enterprise host.

use crate::{OctocrabClient, DEFAULT_API_URL, DEFAULT_HOST};
use anyhow::{Context, Result};
use log::{debug, info};
use octocrab::Octocrab;
use std::sync::Arc;

/// Resolves GitHub tokens for different hosts
///
/// Tries multiple sources in order:
/// 1. Host-specific env var (e.g., `GITHUB_TOKEN_GHE_EXAMPLE_COM`)
/// 2. `gh auth token --hostname {host}` command
/// 3. Generic `GITHUB_TOKEN` or `GH_TOKEN` (github.com only)
#[derive(Debug, Clone)]
pub struct TokenResolver {
    /// Cached default token from GITHUB_TOKEN/GH_TOKEN
    default_token: Option<String>,
}

impl Default for TokenResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenResolver {
    /// Create a new token resolver
    pub fn new() -> Self {
        let default_token = std::env::var("GITHUB_TOKEN")
            .or_else(|_| std::env::var("GH_TOKEN"))
            .ok()
            .filter(|token| !token.trim().is_empty());

        Self { default_token }
    }

    /// Get a token for the given host, `None` when no source has one
    ///
    /// A missing or failing `gh` binary is not an error; it only means the
    /// next source is consulted.
    pub async fn get_token(&self, host: Option<&str>) -> Option<String> {
        let host = host.unwrap_or(DEFAULT_HOST);

        let env_key = host_env_key(host);
        if let Ok(token) = std::env::var(&env_key) {
            if !token.trim().is_empty() {
                debug!("Using token from env var {} for host {}", env_key, host);
                return Some(token.trim().to_string());
            }
        }

        debug!("Trying gh auth token for host {}", host);
        match tokio::process::Command::new("gh")
            .args(["auth", "token", "--hostname", host])
            .output()
            .await
        {
            Ok(output) if output.status.success() => {
                let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !token.is_empty() {
                    debug!("Using token from gh CLI for host {}", host);
                    return Some(token);
                }
            }
            Ok(_) => debug!("gh CLI has no token for host {}", host),
            Err(e) => debug!("gh CLI unavailable: {}", e),
        }

        if host == DEFAULT_HOST {
            if let Some(ref token) = self.default_token {
                debug!("Using default token (GITHUB_TOKEN/GH_TOKEN) for github.com");
                return Some(token.clone());
            }
        }

        None
    }
}

/// Name of the host-specific token env var, e.g. `GITHUB_TOKEN_GITHUB_COM`
pub fn host_env_key(host: &str) -> String {
    format!(
        "GITHUB_TOKEN_{}",
        host.replace(['.', '-'], "_").to_uppercase()
    )
}

/// REST API base URL for a host
pub fn api_base_url(host: Option<&str>) -> String {
    match host {
        Some(h) if h != DEFAULT_HOST => format!("https://{}/api/v3", h),
        _ => DEFAULT_API_URL.to_string(),
    }
}

/// Build an authenticated client for the given host (None = github.com)
pub fn build_client(token: &str, host: Option<&str>) -> Result<OctocrabClient> {
    let effective_host = host.unwrap_or(DEFAULT_HOST);
    info!("Creating GitHub client for host: {}", effective_host);

    let base_url = api_base_url(host);
    let mut builder = Octocrab::builder().personal_token(token.to_string());
    if base_url != DEFAULT_API_URL {
        builder = builder
            .base_uri(base_url.as_str())
            .context("Failed to set base URI")?;
    }

    let octocrab = builder.build().context("Failed to build Octocrab client")?;
    Ok(OctocrabClient::with_base_url(Arc::new(octocrab), base_url))
}
