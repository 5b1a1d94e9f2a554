//! Octocrab-based GitHub API client
//!
//! Direct implementation of the `GitHubClient` trait using the octocrab library.
//! Typed GET endpoints go through `Octocrab::get`; the mutating endpoints whose
//! responses carry no body are issued as raw requests and judged by status.

use crate::client::GitHubClient;
use crate::pagination::{collect_pages, Page, PER_PAGE};
use crate::types::{
    PublicKey, PutSecretBody, Secret, SecretsPage, Workflow, WorkflowRun, WorkflowRunsPage,
    WorkflowsPage,
};
use crate::DEFAULT_API_URL;
use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use octocrab::Octocrab;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::sync::Arc;

/// Characters escaped in a single URL path segment
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Direct GitHub API client using octocrab
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
    base_url: String,
}

impl OctocrabClient {
    /// Create a new client for public GitHub
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self::with_base_url(octocrab, DEFAULT_API_URL.to_string())
    }

    /// Create a client whose raw requests target `base_url`
    ///
    /// `base_url` must match the base URI the octocrab instance was built with.
    pub fn with_base_url(octocrab: Arc<Octocrab>, base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { octocrab, base_url }
    }

    /// Get a reference to the underlying octocrab instance
    pub fn octocrab(&self) -> &Octocrab {
        &self.octocrab
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }
}

#[async_trait]
impl GitHubClient for OctocrabClient {
    async fn authenticated_user(&self) -> anyhow::Result<String> {
        debug!("Fetching authenticated user");
        let user = self.octocrab.current().user().await?;
        Ok(user.login)
    }

    async fn list_workflows(&self, owner: &str, repo: &str) -> anyhow::Result<Vec<Workflow>> {
        debug!("Fetching workflows for {}/{}", owner, repo);

        let octocrab = &self.octocrab;
        let workflows = collect_pages(|page_num| {
            let route = format!(
                "/repos/{}/{}/actions/workflows?per_page={}&page={}",
                owner, repo, PER_PAGE, page_num
            );
            async move {
                let page: WorkflowsPage = octocrab.get(route, None::<&()>).await?;
                Ok::<_, anyhow::Error>(Page {
                    items: page.workflows,
                    total_count: page.total_count,
                })
            }
        })
        .await?;

        debug!("Fetched {} workflows for {}/{}", workflows.len(), owner, repo);
        Ok(workflows)
    }

    async fn list_workflow_runs(
        &self,
        owner: &str,
        repo: &str,
    ) -> anyhow::Result<Vec<WorkflowRun>> {
        debug!("Fetching workflow runs for {}/{}", owner, repo);

        let octocrab = &self.octocrab;
        let runs = collect_pages(|page_num| {
            let route = format!(
                "/repos/{}/{}/actions/runs?per_page={}&page={}",
                owner, repo, PER_PAGE, page_num
            );
            async move {
                let page: WorkflowRunsPage = octocrab.get(route, None::<&()>).await?;
                Ok::<_, anyhow::Error>(Page {
                    items: page.workflow_runs,
                    total_count: page.total_count,
                })
            }
        })
        .await?;

        debug!("Fetched {} workflow runs for {}/{}", runs.len(), owner, repo);
        Ok(runs)
    }

    async fn download_run_logs(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
    ) -> anyhow::Result<Bytes> {
        debug!("Downloading logs of run {} for {}/{}", run_id, owner, repo);

        let archive = self
            .octocrab
            .actions()
            .download_workflow_run_logs(owner, repo, run_id.into())
            .await?;

        debug!("Downloaded {} bytes of logs for run {}", archive.len(), run_id);
        Ok(archive)
    }

    async fn rerun_workflow_run(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
    ) -> anyhow::Result<()> {
        debug!("Re-running run {} for {}/{}", run_id, owner, repo);

        let url = self.url(&format!(
            "/repos/{}/{}/actions/runs/{}/rerun",
            owner, repo, run_id
        ));
        let response = self.octocrab._post(url, None::<&()>).await?;
        ensure_success(response.status().as_u16(), "re-run workflow run")
    }

    async fn list_secrets(&self, owner: &str, repo: &str) -> anyhow::Result<Vec<Secret>> {
        debug!("Fetching secrets for {}/{}", owner, repo);

        let octocrab = &self.octocrab;
        let secrets = collect_pages(|page_num| {
            let route = format!(
                "/repos/{}/{}/actions/secrets?per_page={}&page={}",
                owner, repo, PER_PAGE, page_num
            );
            async move {
                let page: SecretsPage = octocrab.get(route, None::<&()>).await?;
                Ok::<_, anyhow::Error>(Page {
                    items: page.secrets,
                    total_count: page.total_count,
                })
            }
        })
        .await?;

        Ok(secrets)
    }

    async fn secrets_public_key(&self, owner: &str, repo: &str) -> anyhow::Result<PublicKey> {
        debug!("Fetching secrets public key for {}/{}", owner, repo);

        let route = format!("/repos/{}/{}/actions/secrets/public-key", owner, repo);
        let key: PublicKey = self.octocrab.get(route, None::<&()>).await?;
        Ok(key)
    }

    async fn put_secret(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        encrypted_value: &str,
        key_id: &str,
    ) -> anyhow::Result<()> {
        debug!("Writing secret {} for {}/{}", name, owner, repo);

        let url = self.url(&secret_route(owner, repo, name));
        let body = PutSecretBody {
            encrypted_value,
            key_id,
        };
        let response = self.octocrab._put(url, Some(&body)).await?;
        ensure_success(response.status().as_u16(), "write secret")
    }

    async fn delete_secret(&self, owner: &str, repo: &str, name: &str) -> anyhow::Result<()> {
        debug!("Deleting secret {} for {}/{}", name, owner, repo);

        let url = self.url(&secret_route(owner, repo, name));
        let response = self.octocrab._delete(url, None::<&()>).await?;
        ensure_success(response.status().as_u16(), "delete secret")
    }
}

/// `/repos/{owner}/{repo}/actions/secrets/{name}` with the name escaped
fn secret_route(owner: &str, repo: &str, name: &str) -> String {
    format!(
        "/repos/{}/{}/actions/secrets/{}",
        owner,
        repo,
        utf8_percent_encode(name, PATH_SEGMENT)
    )
}

/// Turn a non-2xx status of a raw request into an error
fn ensure_success(status: u16, operation: &str) -> anyhow::Result<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "GitHub rejected request to {} (HTTP {})",
            operation,
            status
        ))
    }
}
