//! GitHub API data transfer objects
//!
//! These types represent the data returned from the GitHub Actions API.
//! They only carry the fields the manager reads; unknown fields in the API
//! payloads are ignored during deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A workflow definition registered in a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    /// Workflow ID
    pub id: u64,

    /// Display name of the workflow
    pub name: String,

    /// Path of the workflow file (e.g. `.github/workflows/ci.yml`)
    pub path: String,

    /// Workflow state (e.g. "active", "disabled_manually")
    #[serde(default)]
    pub state: String,
}

/// One execution of a workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRun {
    /// Workflow run ID (unique per repository)
    pub id: u64,

    /// Ordinal run number within the workflow
    pub run_number: u64,

    /// Event that triggered the run (e.g. "push")
    pub event: String,

    /// Current status (e.g. "queued", "in_progress", "completed")
    pub status: String,

    /// Terminal conclusion, `None` while the run is still active
    pub conclusion: Option<String>,

    /// Name of the workflow the run belongs to
    #[serde(default)]
    pub name: Option<String>,

    /// Branch the run executed on
    #[serde(default)]
    pub head_branch: Option<String>,
}

impl WorkflowRun {
    /// Whether the run has finished (with any conclusion)
    pub fn is_completed(&self) -> bool {
        self.conclusion.is_some()
    }

    /// Parsed conclusion, if the run has one
    pub fn conclusion(&self) -> Option<RunConclusion> {
        self.conclusion.as_deref().map(RunConclusion::from_api)
    }
}

/// Conclusion of a completed workflow run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunConclusion {
    /// Workflow succeeded
    Success,
    /// Workflow failed
    Failure,
    /// Workflow was neutral
    Neutral,
    /// Workflow was cancelled
    Cancelled,
    /// Workflow was skipped
    Skipped,
    /// Workflow timed out
    TimedOut,
    /// Action required
    ActionRequired,
    /// Workflow is stale
    Stale,
    /// Anything GitHub adds later
    Other,
}

impl RunConclusion {
    /// Convert conclusion string from the GitHub API to our enum
    ///
    /// Matching is exact: GitHub reports conclusions in lowercase snake case.
    pub fn from_api(conclusion: &str) -> Self {
        match conclusion {
            "success" => Self::Success,
            "failure" => Self::Failure,
            "neutral" => Self::Neutral,
            "cancelled" => Self::Cancelled,
            "skipped" => Self::Skipped,
            "timed_out" => Self::TimedOut,
            "action_required" => Self::ActionRequired,
            "stale" => Self::Stale,
            _ => Self::Other,
        }
    }
}

/// A repository secret (metadata only, values are write-only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    /// Secret name, unique per repository
    pub name: String,

    /// When the secret was created
    pub created_at: DateTime<Utc>,

    /// When the secret was last updated
    pub updated_at: DateTime<Utc>,
}

/// The repository public key used to seal secret values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    /// Identifier that must accompany values encrypted with this key
    pub key_id: String,

    /// Base64-encoded X25519 public key
    pub key: String,
}

/// Response envelope of `GET /repos/{owner}/{repo}/actions/workflows`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WorkflowsPage {
    pub total_count: u64,
    pub workflows: Vec<Workflow>,
}

/// Response envelope of `GET /repos/{owner}/{repo}/actions/runs`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WorkflowRunsPage {
    pub total_count: u64,
    pub workflow_runs: Vec<WorkflowRun>,
}

/// Response envelope of `GET /repos/{owner}/{repo}/actions/secrets`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SecretsPage {
    pub total_count: u64,
    pub secrets: Vec<Secret>,
}

/// Request body of `PUT /repos/{owner}/{repo}/actions/secrets/{name}`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct PutSecretBody<'a> {
    pub encrypted_value: &'a str,
    pub key_id: &'a str,
}
