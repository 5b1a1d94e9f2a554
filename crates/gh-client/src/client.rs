//! GitHub client trait
//!
//! This module defines the core `GitHubClient` trait that all client
//! implementations must satisfy.

use crate::types::{PublicKey, Secret, Workflow, WorkflowRun};
use async_trait::async_trait;
use bytes::Bytes;

/// GitHub Actions API client trait
///
/// Defines the interface for interacting with the GitHub Actions API.
/// Every call is keyed by `owner`/`repo` and authenticated with the token
/// the implementation was built with.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks and threads.
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::{GitHubClient, WorkflowRun};
///
/// async fn completed_runs(client: &dyn GitHubClient) -> anyhow::Result<Vec<WorkflowRun>> {
///     let runs = client.list_workflow_runs("rust-lang", "rust").await?;
///     Ok(runs.into_iter().filter(|run| run.is_completed()).collect())
/// }
/// ```
#[async_trait]
pub trait GitHubClient: Send + Sync {
    /// Login of the user the token belongs to
    ///
    /// Fails when the token is missing, malformed or expired.
    async fn authenticated_user(&self) -> anyhow::Result<String>;

    /// List every workflow of a repository (all pages)
    async fn list_workflows(&self, owner: &str, repo: &str) -> anyhow::Result<Vec<Workflow>>;

    /// List every workflow run of a repository (all pages, newest first)
    ///
    /// Runs that are still in progress are included; callers filter.
    async fn list_workflow_runs(&self, owner: &str, repo: &str)
        -> anyhow::Result<Vec<WorkflowRun>>;

    /// Download the log archive (zip) of a workflow run
    async fn download_run_logs(&self, owner: &str, repo: &str, run_id: u64)
        -> anyhow::Result<Bytes>;

    /// Re-run a workflow run
    async fn rerun_workflow_run(&self, owner: &str, repo: &str, run_id: u64)
        -> anyhow::Result<()>;

    // === Secrets ===

    /// List repository secrets (names and timestamps only)
    async fn list_secrets(&self, owner: &str, repo: &str) -> anyhow::Result<Vec<Secret>>;

    /// Fetch the public key that secret values must be sealed with
    async fn secrets_public_key(&self, owner: &str, repo: &str) -> anyhow::Result<PublicKey>;

    /// Create or update a secret with an already sealed, base64-encoded value
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `name` - Secret name
    /// * `encrypted_value` - Base64 sealed-box ciphertext
    /// * `key_id` - ID of the public key used for sealing
    async fn put_secret(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        encrypted_value: &str,
        key_id: &str,
    ) -> anyhow::Result<()>;

    /// Delete a secret by name
    async fn delete_secret(&self, owner: &str, repo: &str, name: &str) -> anyhow::Result<()>;
}
