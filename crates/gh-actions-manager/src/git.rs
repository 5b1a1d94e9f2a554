//! Local git operations
//!
//! Workflow edits happen in a fresh clone. Every command runs with an
//! explicit working directory; the process directory never changes.
//!
//! The access token is only put into the URL of `clone` and `push`
//! commands. `origin` of a working copy never carries it.

use crate::error::{ManagerError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// A checked out repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingCopy {
    root: PathBuf,
}

impl WorkingCopy {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a repository-relative file
    pub fn file(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

#[async_trait]
pub trait GitService: Send + Sync {
    /// Clone `remote_url` into `target`, replacing a stale directory
    ///
    /// `remote_url` is recorded as `origin` and must not carry credentials.
    async fn clone_repo(&self, remote_url: &str, target: &Path) -> Result<WorkingCopy>;

    /// Set the committer identity of the working copy
    async fn configure_identity(&self, wc: &WorkingCopy, name: &str, email: &str) -> Result<()>;

    /// Commit one changed file and push it to the current branch of `origin`
    async fn commit_and_push(&self, wc: &WorkingCopy, file: &str, message: &str) -> Result<()>;
}

/// Runs the `git` binary
#[derive(Debug, Default, Clone)]
pub struct LocalGit {
    /// Hidden from error messages and logs
    token: Option<String>,
}

impl LocalGit {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// `remote_url` with the token as credentials, for HTTPS remotes
    fn authenticated(&self, remote_url: &str) -> String {
        match (self.token.as_deref(), remote_url.strip_prefix("https://")) {
            (Some(token), Some(rest)) if !token.is_empty() => {
                format!("https://x-access-token:{}@{}", token, rest)
            }
            _ => remote_url.to_string(),
        }
    }

    fn redact(&self, text: &str) -> String {
        match self.token.as_deref() {
            Some(token) if !token.is_empty() => text.replace(token, "***"),
            _ => text.to_string(),
        }
    }

    async fn git(&self, dir: &Path, args: &[&str]) -> Result<String> {
        let command = args.first().copied().unwrap_or_default().to_string();
        log::debug!("git {} (in {})", self.redact(&args.join(" ")), dir.display());

        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .await
            .map_err(|e| ManagerError::Git {
                command: command.clone(),
                message: format!("failed to run git: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ManagerError::Git {
                command,
                message: self.redact(stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl GitService for LocalGit {
    async fn clone_repo(&self, remote_url: &str, target: &Path) -> Result<WorkingCopy> {
        let io_error = |e: std::io::Error| ManagerError::Git {
            command: "clone".to_string(),
            message: format!("{}: {}", target.display(), e),
        };

        if target.exists() {
            log::debug!("Removing stale working copy {}", target.display());
            tokio::fs::remove_dir_all(target).await.map_err(io_error)?;
        }
        let parent = target.parent().unwrap_or_else(|| Path::new("."));
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;

        let clone_url = self.authenticated(remote_url);
        let target_str = target.to_string_lossy().into_owned();
        self.git(parent, &["clone", "--quiet", clone_url.as_str(), target_str.as_str()])
            .await?;
        self.git(target, &["remote", "set-url", "origin", remote_url])
            .await?;

        log::info!("Cloned into {}", target.display());
        Ok(WorkingCopy::new(target))
    }

    async fn configure_identity(&self, wc: &WorkingCopy, name: &str, email: &str) -> Result<()> {
        self.git(wc.root(), &["config", "user.name", name]).await?;
        self.git(wc.root(), &["config", "user.email", email]).await?;
        Ok(())
    }

    async fn commit_and_push(&self, wc: &WorkingCopy, file: &str, message: &str) -> Result<()> {
        self.git(wc.root(), &["add", "--", file]).await?;
        self.git(wc.root(), &["commit", "--quiet", "-m", message])
            .await?;
        let origin = self.git(wc.root(), &["remote", "get-url", "origin"]).await?;
        let push_url = self.authenticated(&origin);
        self.git(wc.root(), &["push", "--quiet", push_url.as_str(), "HEAD"])
            .await?;
        log::info!("Pushed {:?} ({})", message, file);
        Ok(())
    }
}
