//! Repository identity
//!
//! Resolves `owner/name` from the URLs users paste: HTTPS, SSH, with or
//! without `.git`, and deep links into the repository.

use crate::error::{ManagerError, Result};
use crate::prompt::Prompter;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Matches `github.com/<owner>/<repo>` and `github.com:<owner>/<repo>`
fn repo_url_regex() -> &'static Regex {
    static REPO_URL_REGEX: OnceLock<Regex> = OnceLock::new();
    REPO_URL_REGEX.get_or_init(|| {
        Regex::new(r"(?i:github\.com)[/:]([A-Za-z0-9-]+)/([A-Za-z0-9-]+)").unwrap()
    })
}

/// A GitHub repository the manager operates on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoIdentity {
    /// Organization or owner name
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoIdentity {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Extract owner and repository name from a GitHub URL
    ///
    /// Supports:
    /// - `https://github.com/owner/repo`
    /// - `https://github.com/owner/repo.git`
    /// - `git@github.com:owner/repo.git`
    /// - `https://github.com/owner/repo/actions/runs/1`
    pub fn resolve(url: &str) -> Result<Self> {
        let captures = repo_url_regex()
            .captures(url.trim())
            .ok_or_else(|| ManagerError::InvalidRepoUrl(url.to_string()))?;

        Ok(Self::new(&captures[1], &captures[2]))
    }

    /// HTTPS remote URL, without credentials
    pub fn remote_url(&self) -> String {
        format!("https://github.com/{}/{}.git", self.owner, self.name)
    }

    /// Directory name of this repository's working copy
    pub fn working_copy_name(&self) -> String {
        format!("{}-{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Ask for a repository URL until one resolves
pub fn prompt_repo(prompter: &mut dyn Prompter) -> Result<RepoIdentity> {
    loop {
        let url = prompter.input("Please enter the URL of the GitHub repository", None)?;
        match RepoIdentity::resolve(&url) {
            Ok(repo) => {
                log::info!("Working repository: {}", repo);
                return Ok(repo);
            }
            Err(err) => {
                log::warn!("{}", err);
                prompter.print(&err.user_message())?;
            }
        }
    }
}
