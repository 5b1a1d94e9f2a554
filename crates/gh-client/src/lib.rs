//! GitHub Actions API client
//!
//! This crate provides a trait-based client for the parts of the GitHub REST
//! API that deal with Actions: workflows, workflow runs, run logs and
//! repository secrets. Consumers program against the `GitHubClient` trait so
//! the interactive layer can be exercised against in-memory fakes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              GitHubClient trait                  │
//! │  - authenticated_user()                          │
//! │  - list_workflows() / list_workflow_runs()       │
//! │  - download_run_logs() / rerun_workflow_run()    │
//! │  - list_secrets() / put_secret() / ...           │
//! └─────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//!              ┌─────────────────┐
//!              │ OctocrabClient  │
//!              │ (direct API)    │
//!              └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_client::{GitHubClient, OctocrabClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let octocrab = octocrab::Octocrab::builder()
//!     .personal_token("token".to_string())
//!     .build()?;
//!
//! let client = OctocrabClient::new(Arc::new(octocrab));
//! let runs = client.list_workflow_runs("owner", "repo").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod client_manager;
pub mod octocrab_client;
pub mod pagination;
pub mod types;

/// Default GitHub host (public GitHub)
pub const DEFAULT_HOST: &str = "github.com";

/// Base URL of the public GitHub REST API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

pub use client::GitHubClient;
pub use client_manager::{build_client, TokenResolver};
pub use octocrab_client::OctocrabClient;
pub use types::{PublicKey, RunConclusion, Secret, Workflow, WorkflowRun};

// Re-export octocrab so consumers don't need to depend on it directly
pub use octocrab;
