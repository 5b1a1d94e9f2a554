//! The closed set of things a user can do

use crate::error::{ManagerError, Result};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Top-level menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
pub enum Action {
    #[strum(serialize = "Edit a workflow name")]
    RenameWorkflow,
    #[strum(serialize = "Edit a workflow trigger")]
    EditTriggers,
    #[strum(serialize = "Check workflow runs")]
    ShowRunLogs,
    #[strum(serialize = "Re-run a workflow run")]
    RerunWorkflow,
    #[strum(serialize = "Manage Secrets")]
    ManageSecrets,
    #[strum(serialize = "Change Working Repo")]
    ChangeRepo,
    #[strum(serialize = "Exit")]
    Exit,
}

/// Secrets sub-menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
pub enum SecretAction {
    #[strum(serialize = "List all secrets")]
    List,
    #[strum(serialize = "Add or update a secret")]
    Upsert,
    #[strum(serialize = "Delete a secret")]
    Delete,
}

impl Action {
    /// Menu labels in display order
    pub fn labels() -> Vec<String> {
        Self::iter().map(|a| a.to_string()).collect()
    }

    /// Action for a chosen menu label
    pub fn from_label(label: &str) -> Result<Self> {
        label
            .parse()
            .map_err(|_| ManagerError::InvalidAction(label.to_string()))
    }

    /// Stable identifier for logs and telemetry
    pub fn id(&self) -> &'static str {
        match self {
            Self::RenameWorkflow => "rename_workflow",
            Self::EditTriggers => "edit_triggers",
            Self::ShowRunLogs => "show_run_logs",
            Self::RerunWorkflow => "rerun_workflow",
            Self::ManageSecrets => "manage_secrets",
            Self::ChangeRepo => "change_repo",
            Self::Exit => "exit",
        }
    }
}

impl SecretAction {
    pub fn labels() -> Vec<String> {
        Self::iter().map(|a| a.to_string()).collect()
    }

    pub fn from_label(label: &str) -> Result<Self> {
        label
            .parse()
            .map_err(|_| ManagerError::InvalidAction(label.to_string()))
    }
}
