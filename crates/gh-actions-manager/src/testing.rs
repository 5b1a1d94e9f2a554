//! In-memory doubles for the GitHub API, git, prompts and telemetry

use crate::error::{ManagerError, Result};
use crate::git::{GitService, WorkingCopy};
use crate::prompt::Prompter;
use crate::telemetry::Telemetry;
use async_trait::async_trait;
use bytes::Bytes;
use gh_client::{GitHubClient, PublicKey, Secret, Workflow, WorkflowRun};
use serde_json::Value;
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One scripted answer, consumed in order
#[derive(Debug, Clone)]
pub enum Answer {
    Pick(String),
    Picks(Vec<String>),
    Text(String),
    Confirm(bool),
}

impl Answer {
    pub fn pick(label: impl Into<String>) -> Self {
        Self::Pick(label.into())
    }

    pub fn picks(labels: &[&str]) -> Self {
        Self::Picks(labels.iter().map(|l| l.to_string()).collect())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// Prompter answering from a script and recording what was shown
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    /// Text of the line started by `print_partial`
    partial: String,
    /// Lines passed to `print`, joined with any partial text before them
    pub printed: Vec<String>,
    /// Messages of every question asked
    pub asked: Vec<String>,
    /// Choice lists offered by list prompts
    pub offered: Vec<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, message: &str) -> io::Result<Answer> {
        self.asked.push(message.to_string());
        self.answers.pop_front().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no scripted answer for {:?}", message),
            )
        })
    }

    fn pick(&mut self, message: &str, choices: &[String]) -> io::Result<String> {
        self.offered.push(choices.to_vec());
        match self.next(message)? {
            Answer::Pick(label) => Ok(label),
            other => Err(unexpected(message, &other)),
        }
    }
}

fn unexpected(message: &str, answer: &Answer) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("scripted answer {:?} does not fit prompt {:?}", answer, message),
    )
}

impl Prompter for ScriptedPrompter {
    fn print(&mut self, message: &str) -> io::Result<()> {
        let mut line = std::mem::take(&mut self.partial);
        line.push_str(message);
        self.printed.push(line);
        Ok(())
    }

    fn print_partial(&mut self, text: &str) -> io::Result<()> {
        self.partial.push_str(text);
        Ok(())
    }

    fn select(&mut self, message: &str, choices: &[String]) -> io::Result<String> {
        self.pick(message, choices)
    }

    fn autocomplete(&mut self, message: &str, choices: &[String]) -> io::Result<String> {
        self.pick(message, choices)
    }

    fn multi_select(&mut self, message: &str, choices: &[String]) -> io::Result<Vec<String>> {
        self.offered.push(choices.to_vec());
        match self.next(message)? {
            Answer::Picks(labels) => Ok(labels),
            other => Err(unexpected(message, &other)),
        }
    }

    fn input(&mut self, message: &str, default: Option<&str>) -> io::Result<String> {
        match self.next(message)? {
            Answer::Text(text) if text.is_empty() => Ok(default.unwrap_or_default().to_string()),
            Answer::Text(text) => Ok(text),
            other => Err(unexpected(message, &other)),
        }
    }

    fn secret(&mut self, message: &str) -> io::Result<String> {
        match self.next(message)? {
            Answer::Text(text) => Ok(text),
            other => Err(unexpected(message, &other)),
        }
    }

    fn confirm(&mut self, message: &str) -> io::Result<bool> {
        match self.next(message)? {
            Answer::Confirm(yes) => Ok(yes),
            other => Err(unexpected(message, &other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackedEvent {
    pub tags: Vec<String>,
    pub event: String,
    pub metadata: Value,
}

#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    events: Mutex<Vec<TrackedEvent>>,
}

impl RecordingTelemetry {
    pub fn events(&self) -> Vec<TrackedEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Telemetry for RecordingTelemetry {
    fn track(&self, tags: &[&str], event: &str, metadata: &Value) {
        self.events.lock().unwrap().push(TrackedEvent {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            event: event.to_string(),
            metadata: metadata.clone(),
        });
    }
}

/// GitHub API double holding one repository's state
#[derive(Debug, Default)]
pub struct FakeGitHub {
    pub login: Option<String>,
    pub workflows: Vec<Workflow>,
    pub runs: Vec<WorkflowRun>,
    pub logs: Vec<u8>,
    pub public_key: Option<PublicKey>,
    pub secrets: Mutex<Vec<Secret>>,
    /// Every mutating call, e.g. `rerun octo/hello 7`
    pub calls: Mutex<Vec<String>>,
    /// Values received by `put_secret`, keyed by name
    pub stored: Mutex<Vec<(String, String, String)>>,
}

impl FakeGitHub {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl GitHubClient for FakeGitHub {
    async fn authenticated_user(&self) -> anyhow::Result<String> {
        self.login
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Bad credentials (HTTP 401)"))
    }

    async fn list_workflows(&self, _owner: &str, _repo: &str) -> anyhow::Result<Vec<Workflow>> {
        Ok(self.workflows.clone())
    }

    async fn list_workflow_runs(
        &self,
        _owner: &str,
        _repo: &str,
    ) -> anyhow::Result<Vec<WorkflowRun>> {
        Ok(self.runs.clone())
    }

    async fn download_run_logs(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
    ) -> anyhow::Result<Bytes> {
        self.record(format!("logs {}/{} {}", owner, repo, run_id));
        Ok(Bytes::from(self.logs.clone()))
    }

    async fn rerun_workflow_run(&self, owner: &str, repo: &str, run_id: u64) -> anyhow::Result<()> {
        self.record(format!("rerun {}/{} {}", owner, repo, run_id));
        Ok(())
    }

    async fn list_secrets(&self, _owner: &str, _repo: &str) -> anyhow::Result<Vec<Secret>> {
        Ok(self.secrets.lock().unwrap().clone())
    }

    async fn secrets_public_key(&self, _owner: &str, _repo: &str) -> anyhow::Result<PublicKey> {
        self.public_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Not Found (HTTP 404)"))
    }

    async fn put_secret(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        encrypted_value: &str,
        key_id: &str,
    ) -> anyhow::Result<()> {
        self.record(format!("put {}/{} {}", owner, repo, name));
        self.stored.lock().unwrap().push((
            name.to_string(),
            encrypted_value.to_string(),
            key_id.to_string(),
        ));
        Ok(())
    }

    async fn delete_secret(&self, owner: &str, repo: &str, name: &str) -> anyhow::Result<()> {
        self.record(format!("delete {}/{} {}", owner, repo, name));
        self.secrets.lock().unwrap().retain(|s| s.name != name);
        Ok(())
    }
}

/// Git double: a clone materializes the given files, pushes are recorded
#[derive(Debug, Default)]
pub struct FakeGit {
    pub files: Vec<(String, String)>,
    /// Make `commit_and_push` fail like a rejected push
    pub fail_push: bool,
    pub clones: Mutex<Vec<String>>,
    /// Root directory of every working copy
    pub roots: Mutex<Vec<PathBuf>>,
    pub identities: Mutex<Vec<(String, String)>>,
    /// `(file, message, content at commit time)`
    pub pushes: Mutex<Vec<(String, String, String)>>,
}

impl FakeGit {
    pub fn with_file(path: &str, content: &str) -> Self {
        Self {
            files: vec![(path.to_string(), content.to_string())],
            ..Default::default()
        }
    }

    pub fn pushes(&self) -> Vec<(String, String, String)> {
        self.pushes.lock().unwrap().clone()
    }
}

#[async_trait]
impl GitService for FakeGit {
    async fn clone_repo(&self, remote_url: &str, target: &Path) -> Result<WorkingCopy> {
        self.clones.lock().unwrap().push(remote_url.to_string());
        self.roots.lock().unwrap().push(target.to_path_buf());
        let wc = WorkingCopy::new(target);
        for (path, content) in &self.files {
            let file = wc.file(path);
            let write = |file: &Path| -> io::Result<()> {
                if let Some(parent) = file.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(file, content)
            };
            write(&file).map_err(|e| ManagerError::Git {
                command: "clone".into(),
                message: e.to_string(),
            })?;
        }
        Ok(wc)
    }

    async fn configure_identity(&self, _wc: &WorkingCopy, name: &str, email: &str) -> Result<()> {
        self.identities
            .lock()
            .unwrap()
            .push((name.to_string(), email.to_string()));
        Ok(())
    }

    async fn commit_and_push(&self, wc: &WorkingCopy, file: &str, message: &str) -> Result<()> {
        if self.fail_push {
            return Err(ManagerError::Git {
                command: "push".into(),
                message: "remote rejected".into(),
            });
        }
        let content = std::fs::read_to_string(wc.file(file)).unwrap_or_default();
        self.pushes
            .lock()
            .unwrap()
            .push((file.to_string(), message.to_string(), content));
        Ok(())
    }
}

pub fn workflow(id: u64, name: &str, path: &str) -> Workflow {
    Workflow {
        id,
        name: name.to_string(),
        path: path.to_string(),
        state: "active".to_string(),
    }
}

pub fn run(id: u64, run_number: u64, event: &str, conclusion: Option<&str>) -> WorkflowRun {
    WorkflowRun {
        id,
        run_number,
        event: event.to_string(),
        status: if conclusion.is_some() { "completed" } else { "in_progress" }.to_string(),
        conclusion: conclusion.map(str::to_string),
        name: Some("CI".to_string()),
        head_branch: Some("main".to_string()),
    }
}
