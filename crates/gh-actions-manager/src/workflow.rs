//! Workflow YAML documents
//!
//! Edits touch only the `name` and `on` keys. The document is kept as an
//! ordered mapping so `jobs` and any other keys are written back unchanged.

use crate::error::{ManagerError, Result};
use serde_yaml::{Mapping, Value};
use std::path::Path;

const NAME_KEY: &str = "name";
const TRIGGER_KEY: &str = "on";
const JOBS_KEY: &str = "jobs";

#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowDocument {
    root: Mapping,
}

impl WorkflowDocument {
    /// Parse a workflow, the top level must be a mapping
    pub fn parse(text: &str) -> std::result::Result<Self, String> {
        match serde_yaml::from_str::<Value>(text) {
            Ok(Value::Mapping(root)) => Ok(Self { root }),
            Ok(_) => Err("top level is not a mapping".to_string()),
            Err(e) => Err(e.to_string()),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| workflow_error(path, e))?;
        let document = Self::parse(&text).map_err(|message| ManagerError::Workflow {
            path: path.to_path_buf(),
            message,
        })?;

        let jobs = document
            .jobs()
            .and_then(Value::as_mapping)
            .map_or(0, Mapping::len);
        log::debug!("Loaded workflow {} with {} jobs", path.display(), jobs);
        Ok(document)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = self.to_yaml().map_err(|e| workflow_error(path, e))?;
        std::fs::write(path, text).map_err(|e| workflow_error(path, e))?;
        log::debug!("Wrote workflow {}", path.display());
        Ok(())
    }

    pub fn to_yaml(&self) -> std::result::Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.root)
    }

    pub fn name(&self) -> Option<&str> {
        self.root.get(NAME_KEY).and_then(Value::as_str)
    }

    pub fn set_name(&mut self, name: &str) {
        self.root.insert(NAME_KEY.into(), name.into());
    }

    pub fn triggers(&self) -> Option<&Value> {
        self.root.get(TRIGGER_KEY)
    }

    /// Replace the trigger section with a plain list of events
    pub fn set_triggers(&mut self, events: &[String]) {
        let events = events.iter().map(|e| Value::from(e.as_str())).collect();
        self.root.insert(TRIGGER_KEY.into(), Value::Sequence(events));
    }

    pub fn jobs(&self) -> Option<&Value> {
        self.root.get(JOBS_KEY)
    }
}

fn workflow_error(path: &Path, err: impl std::fmt::Display) -> ManagerError {
    ManagerError::Workflow {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
