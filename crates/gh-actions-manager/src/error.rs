//! Error taxonomy of the manager
//!
//! Every failure ends the process: the top level turns a `ManagerError` into
//! a telemetry event, a short message for the user and a non-zero exit code.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("invalid repo URL: {0:?}")]
    InvalidRepoUrl(String),

    #[error("{0}")]
    EmptyResult(String),

    #[error("failed to {operation}: {message}")]
    RemoteApi {
        operation: &'static str,
        message: String,
    },

    #[error("invalid action chosen: {0:?}")]
    InvalidAction(String),

    #[error("git {command} failed: {message}")]
    Git { command: String, message: String },

    #[error("workflow file {}: {message}", .path.display())]
    Workflow { path: PathBuf, message: String },

    #[error("failed to encrypt secret: {0}")]
    Encryption(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("prompt failed: {0}")]
    Prompt(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ManagerError>;

impl ManagerError {
    /// Wrap a failed remote call, keeping the full error chain as text
    pub fn remote(operation: &'static str, err: anyhow::Error) -> Self {
        Self::RemoteApi {
            operation,
            message: format!("{:#}", err),
        }
    }

    /// Short category name used in telemetry metadata
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "authentication",
            Self::InvalidRepoUrl(_) => "invalid_repo_url",
            Self::EmptyResult(_) => "empty_result",
            Self::RemoteApi { .. } => "remote_api",
            Self::InvalidAction(_) => "invalid_action",
            Self::Git { .. } => "git",
            Self::Workflow { .. } => "workflow",
            Self::Encryption(_) => "encryption",
            Self::Config(_) => "config",
            Self::Prompt(_) => "prompt",
        }
    }

    /// Message shown to the user before the process exits
    pub fn user_message(&self) -> String {
        match self {
            Self::Authentication(_) => "❗️  Invalid access token entered!".to_string(),
            Self::InvalidRepoUrl(_) => "❗️  Failed to parse repo URL!".to_string(),
            Self::EmptyResult(message) => format!("🤷  {}", message),
            Self::RemoteApi { operation, .. } => format!("❗️  Failed to {}!", operation),
            Self::InvalidAction(_) => "❗️  Failed to run: invalid action chosen!".to_string(),
            Self::Git { .. } => "😓  Failed to commit and push workflow changes".to_string(),
            Self::Workflow { path, .. } => {
                format!("❗️  Failed to update workflow file {}", path.display())
            }
            Self::Encryption(_) => "❗️  Failed to encrypt the secret value!".to_string(),
            Self::Config(_) => "❗️  Failed to load configuration!".to_string(),
            Self::Prompt(_) => "❗️  Failed to read your answer!".to_string(),
        }
    }
}
