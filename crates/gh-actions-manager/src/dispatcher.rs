//! Action dispatch
//!
//! [`Dispatcher::run`] performs one action and reports how the session goes
//! on. [`Dispatcher::run_session`] drives actions in a loop until the user
//! stops, switching the working repository when asked.

use crate::actions::{Action, SecretAction};
use crate::error::{ManagerError, Result};
use crate::git::{GitService, WorkingCopy};
use crate::prompt::Prompter;
use crate::repo::{prompt_repo, RepoIdentity};
use crate::secrets::{seal_secret, secret_name_problem};
use crate::selection::{
    choose, is_cancelled, is_completed, list_and_choose, run_label, Choice, ChoiceStyle, Selection,
};
use crate::session::Session;
use crate::telemetry::{track_success, Telemetry};
use crate::workflow::WorkflowDocument;
use chrono::{DateTime, Utc};
use gh_actions_config::AppConfig;
use gh_actions_logs::{read_log_archive, step_logs, LogChunks};
use gh_client::{Secret, Workflow};
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;

const FAREWELL: &str = "👋  Thanks for using GitHub Actions Manager!";
const ANOTHER_ACTION: &str = "Do you want to perform another action? Choosing 'N' will exit!";
const MISSING_TRIGGER: &str = "❗️  You must choose an event trigger for a workflow!";

/// What happens after an action completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Continuation {
    /// Ask for the next action on the same repository
    Continue,
    /// Run `action` next, on `repo`
    SwitchRepo { repo: RepoIdentity, action: Action },
    /// End the session
    Stop,
}

/// A workflow file checked out for editing
///
/// The working copy lives in a private temporary directory that is removed
/// when the target is dropped, on success and on every error path.
struct EditTarget {
    _checkout: TempDir,
    wc: WorkingCopy,
    path: String,
    document: WorkflowDocument,
}

pub struct Dispatcher<'a> {
    session: &'a Session,
    config: &'a AppConfig,
    prompter: &'a mut dyn Prompter,
    git: &'a dyn GitService,
    telemetry: &'a dyn Telemetry,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        session: &'a Session,
        config: &'a AppConfig,
        prompter: &'a mut dyn Prompter,
        git: &'a dyn GitService,
        telemetry: &'a dyn Telemetry,
    ) -> Self {
        Self {
            session,
            config,
            prompter,
            git,
            telemetry,
        }
    }

    /// Run actions on `repo` until the user stops or an action fails
    pub async fn run_session(&mut self, repo: RepoIdentity) -> Result<()> {
        let mut repo = repo;
        let mut pending = None;

        loop {
            let action = match pending.take() {
                Some(action) => action,
                None => self.prompt_action()?,
            };

            log::info!("Running {} on {}", action.id(), repo);
            match self.run(&repo, action).await {
                Ok(Continuation::Continue) => {}
                Ok(Continuation::SwitchRepo {
                    repo: next,
                    action,
                }) => {
                    log::info!("Switching working repository {} -> {}", repo, next);
                    repo = next;
                    pending = Some(action);
                }
                Ok(Continuation::Stop) => break,
                Err(err) => {
                    log::error!("{} on {} failed: {}", action.id(), repo, err);
                    return Err(err);
                }
            }
        }

        self.prompter.print(FAREWELL)?;
        Ok(())
    }

    /// Ask which action to run next
    pub fn prompt_action(&mut self) -> Result<Action> {
        let label = self.prompter.select(
            "What would you like to do with this repository?",
            &Action::labels(),
        )?;
        Action::from_label(&label)
    }

    /// Perform one action on `repo`
    pub async fn run(&mut self, repo: &RepoIdentity, action: Action) -> Result<Continuation> {
        match action {
            Action::RenameWorkflow => self.rename_workflow(repo).await,
            Action::EditTriggers => self.edit_triggers(repo).await,
            Action::ShowRunLogs => self.show_run_logs(repo).await,
            Action::RerunWorkflow => self.rerun_workflow(repo).await,
            Action::ManageSecrets => self.manage_secrets(repo).await,
            Action::ChangeRepo => self.change_repo(),
            Action::Exit => Ok(Continuation::Stop),
        }
    }

    // === Workflows ===

    async fn rename_workflow(&mut self, repo: &RepoIdentity) -> Result<Continuation> {
        let mut target = self.checkout_workflow(repo).await?;

        let previous = target.document.name().unwrap_or(&target.path).to_string();
        let name = self
            .prompter
            .input("Please enter a new name for the workflow", None)?;
        target.document.set_name(&name);
        self.save_and_push(&target, "Update workflow name").await?;

        self.succeed(
            Action::RenameWorkflow,
            repo,
            &format!("✅  Workflow {:?} renamed to {:?}", previous, name),
            json!({ "workflow": target.path, "previous_name": previous, "name": name }),
        )
    }

    async fn edit_triggers(&mut self, repo: &RepoIdentity) -> Result<Continuation> {
        let mut target = self.checkout_workflow(repo).await?;
        log::debug!(
            "Current triggers of {}: {:?}",
            target.path,
            target.document.triggers()
        );

        let events = self.prompt_triggers()?;
        target.document.set_triggers(&events);
        self.save_and_push(&target, "Update workflow trigger").await?;

        self.succeed(
            Action::EditTriggers,
            repo,
            &format!(
                "✅  Workflow {} now runs on: {}",
                target.path,
                events.join(", ")
            ),
            json!({ "workflow": target.path, "triggers": events }),
        )
    }

    /// Pick a workflow and check out a working copy to edit it in
    async fn checkout_workflow(&mut self, repo: &RepoIdentity) -> Result<EditTarget> {
        let session = self.session;
        let config = self.config;

        let workflow = list_and_choose(
            &mut *self.prompter,
            Selection {
                message: "Please choose a workflow",
                style: ChoiceStyle::List,
                empty: "There are no workflows to manage for this repo!",
            },
            async {
                session
                    .client()
                    .list_workflows(&repo.owner, &repo.name)
                    .await
                    .map_err(|e| ManagerError::remote("list repo workflows", e))
            },
            |_: &Workflow| true,
            |w: &Workflow| w.path.clone(),
        )
        .await?;

        self.prompter.print("⚙️  Setting up the environment")?;
        let name = self.prompter.input(
            "Please enter your name for git commits",
            config.git_user_name.as_deref(),
        )?;
        let email = self.prompter.input(
            "Please enter your email for git commits",
            config.git_user_email.as_deref(),
        )?;

        let checkout = checkout_dir(&config.clone_dir, repo)?;
        let wc = self
            .git
            .clone_repo(&repo.remote_url(), &checkout.path().join(&repo.name))
            .await?;
        self.git.configure_identity(&wc, &name, &email).await?;
        self.prompter.print("🚀  Finished setting up the environment")?;

        log::debug!("Reading workflow {}", workflow.path);
        let document = WorkflowDocument::load(&wc.file(&workflow.path))?;
        Ok(EditTarget {
            _checkout: checkout,
            wc,
            path: workflow.path,
            document,
        })
    }

    async fn save_and_push(&mut self, target: &EditTarget, message: &str) -> Result<()> {
        target.document.save(&target.wc.file(&target.path))?;
        self.prompter.print("⚙️  Committing and pushing workflow changes")?;
        self.git
            .commit_and_push(&target.wc, &target.path, message)
            .await
    }

    /// Ask for trigger events until at least one is chosen
    fn prompt_triggers(&mut self) -> Result<Vec<String>> {
        loop {
            let events = self.prompter.multi_select(
                "Please choose the events that trigger the workflow",
                &self.config.triggers,
            )?;
            if !events.is_empty() {
                return Ok(events);
            }
            self.prompter.print(MISSING_TRIGGER)?;
        }
    }

    // === Runs ===

    async fn show_run_logs(&mut self, repo: &RepoIdentity) -> Result<Continuation> {
        let session = self.session;

        let run = list_and_choose(
            &mut *self.prompter,
            Selection {
                message: "Please choose a workflow run",
                style: ChoiceStyle::List,
                empty: "There are no workflow runs for this repo!",
            },
            async {
                session
                    .client()
                    .list_workflow_runs(&repo.owner, &repo.name)
                    .await
                    .map_err(|e| ManagerError::remote("list repo workflow runs", e))
            },
            is_completed,
            run_label,
        )
        .await?;

        self.prompter
            .print(&format!("⚙️  Downloading logs of workflow run {}", run.id))?;
        let archive = session
            .client()
            .download_run_logs(&repo.owner, &repo.name, run.id)
            .await
            .map_err(|e| ManagerError::remote("get workflow run logs", e))?;
        let logs = read_log_archive(&archive).map_err(|e| ManagerError::RemoteApi {
            operation: "read workflow run logs",
            message: e.to_string(),
        })?;

        for job in step_logs(logs) {
            self.prompter.print(&format!("📄  {}", job.name))?;
            self.print_log(&job.content)?;
        }

        self.succeed(
            Action::ShowRunLogs,
            repo,
            &format!("✅  Printed the logs of workflow run {}", run.id),
            json!({ "run_id": run.id }),
        )
    }

    /// Print a log body chunk by chunk, a chunk cut mid-line continues it
    fn print_log(&mut self, content: &str) -> Result<()> {
        let mut chunks = LogChunks::new(content, self.config.log_chunk_size).peekable();
        while let Some(chunk) = chunks.next() {
            match chunk.strip_suffix('\n') {
                Some(lines) => self.prompter.print(lines)?,
                None if chunks.peek().is_none() => self.prompter.print(chunk)?,
                None => self.prompter.print_partial(chunk)?,
            }
        }
        Ok(())
    }

    async fn rerun_workflow(&mut self, repo: &RepoIdentity) -> Result<Continuation> {
        let session = self.session;

        let run = list_and_choose(
            &mut *self.prompter,
            Selection {
                message: "Please choose a cancelled workflow run to re-run",
                style: ChoiceStyle::List,
                empty: "There are no cancelled workflow runs for this repo!",
            },
            async {
                session
                    .client()
                    .list_workflow_runs(&repo.owner, &repo.name)
                    .await
                    .map_err(|e| ManagerError::remote("list repo workflow runs", e))
            },
            is_cancelled,
            run_label,
        )
        .await?;

        session
            .client()
            .rerun_workflow_run(&repo.owner, &repo.name, run.id)
            .await
            .map_err(|e| ManagerError::remote("re-run workflow run", e))?;

        self.succeed(
            Action::RerunWorkflow,
            repo,
            &format!("✅  Workflow run {} has been re-run!", run.id),
            json!({ "run_id": run.id }),
        )
    }

    // === Secrets ===

    async fn manage_secrets(&mut self, repo: &RepoIdentity) -> Result<Continuation> {
        let label = self.prompter.select(
            "What would you like to do with the repo secrets?",
            &SecretAction::labels(),
        )?;

        match SecretAction::from_label(&label)? {
            SecretAction::List => self.list_secrets(repo).await,
            SecretAction::Upsert => self.upsert_secret(repo).await,
            SecretAction::Delete => self.delete_secret(repo).await,
        }
    }

    async fn fetch_secrets(&self, repo: &RepoIdentity) -> Result<Vec<Secret>> {
        self.session
            .client()
            .list_secrets(&repo.owner, &repo.name)
            .await
            .map_err(|e| ManagerError::remote("list repo secrets", e))
    }

    async fn list_secrets(&mut self, repo: &RepoIdentity) -> Result<Continuation> {
        let secrets = self.fetch_secrets(repo).await?;

        if secrets.is_empty() {
            self.prompter.print("🤷  There are no secrets in this repo!")?;
        }
        for secret in &secrets {
            self.prompter.print(&secret_line(secret))?;
        }

        self.succeed(
            Action::ManageSecrets,
            repo,
            &format!("✅  Listed {} secrets", secrets.len()),
            json!({ "secret_action": "list", "count": secrets.len() }),
        )
    }

    async fn upsert_secret(&mut self, repo: &RepoIdentity) -> Result<Continuation> {
        let client = self.session.client();

        let name = self.prompt_secret_name()?;
        let value = self
            .prompter
            .secret(&format!("Please enter the value of {}", name))?;

        self.prompter.print("⚙️  Adding secret to the repo")?;
        let key = client
            .secrets_public_key(&repo.owner, &repo.name)
            .await
            .map_err(|e| ManagerError::remote("get repo public key", e))?;
        let sealed = seal_secret(&value, &key.key)?;
        client
            .put_secret(&repo.owner, &repo.name, &name, &sealed, &key.key_id)
            .await
            .map_err(|e| ManagerError::remote("add secret to repo", e))?;

        self.succeed(
            Action::ManageSecrets,
            repo,
            &format!("✅  Secret {} has been added to the repo!", name),
            json!({ "secret_action": "upsert", "secret": name }),
        )
    }

    /// Ask for a secret name until GitHub would accept it
    fn prompt_secret_name(&mut self) -> Result<String> {
        loop {
            let name = self
                .prompter
                .input("Please enter the name of the secret", None)?;
            let name = name.trim();
            match secret_name_problem(name) {
                None => return Ok(name.to_string()),
                Some(problem) => self.prompter.print(&format!("❗️  {}", problem))?,
            }
        }
    }

    async fn delete_secret(&mut self, repo: &RepoIdentity) -> Result<Continuation> {
        let secrets = self.fetch_secrets(repo).await?;
        if secrets.is_empty() {
            return self.succeed(
                Action::ManageSecrets,
                repo,
                "🤷  There are no secrets to delete in this repo!",
                json!({ "secret_action": "delete", "secret": null }),
            );
        }

        let choices = secrets
            .into_iter()
            .map(|s| Choice {
                label: s.name.clone(),
                record: s.name,
            })
            .collect();
        let name = choose(
            &mut *self.prompter,
            Selection {
                message: "Please choose a secret to delete",
                style: ChoiceStyle::Autocomplete,
                empty: "There are no secrets to delete in this repo!",
            },
            choices,
        )?;

        let confirmed = self.prompter.confirm(&format!(
            "🗑️  Please confirm that you want to remove {} from the repo",
            name
        ))?;
        if !confirmed {
            return self.succeed(
                Action::ManageSecrets,
                repo,
                &format!("⬜  {} was not removed from the repo!", name),
                json!({ "secret_action": "delete", "secret": name, "deleted": false }),
            );
        }

        self.session
            .client()
            .delete_secret(&repo.owner, &repo.name, &name)
            .await
            .map_err(|e| ManagerError::remote("delete secret from repo", e))?;

        self.succeed(
            Action::ManageSecrets,
            repo,
            &format!("🔥  {} has been removed from the repo", name),
            json!({ "secret_action": "delete", "secret": name, "deleted": true }),
        )
    }

    // === Session ===

    fn change_repo(&mut self) -> Result<Continuation> {
        let repo = prompt_repo(&mut *self.prompter)?;
        let action = self.prompt_action()?;
        Ok(Continuation::SwitchRepo { repo, action })
    }

    /// Record a completed action and ask whether to go on
    fn succeed(
        &mut self,
        action: Action,
        repo: &RepoIdentity,
        message: &str,
        details: Value,
    ) -> Result<Continuation> {
        track_success(
            self.telemetry,
            message,
            json!({
                "action": action.id(),
                "repo": repo.to_string(),
                "user": self.session.username(),
                "details": details,
            }),
        );
        self.prompter.print(message)?;

        if self.prompter.confirm(ANOTHER_ACTION)? {
            Ok(Continuation::Continue)
        } else {
            Ok(Continuation::Stop)
        }
    }
}

/// Fresh directory below `clone_dir`, readable by the current user only
fn checkout_dir(clone_dir: &Path, repo: &RepoIdentity) -> Result<TempDir> {
    let io_error = |e: std::io::Error| ManagerError::Git {
        command: "clone".to_string(),
        message: format!("{}: {}", clone_dir.display(), e),
    };

    std::fs::create_dir_all(clone_dir).map_err(io_error)?;
    tempfile::Builder::new()
        .prefix(&format!("{}-", repo.working_copy_name()))
        .tempdir_in(clone_dir)
        .map_err(io_error)
}

/// `NAME -  Created on: <date> - Updated on: <date>`
fn secret_line(secret: &Secret) -> String {
    format!(
        "{} -  Created on: {} - Updated on: {}",
        secret.name,
        utc_string(&secret.created_at),
        utc_string(&secret.updated_at)
    )
}

fn utc_string(at: &DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::SUCCESS_TAGS;
    use crate::testing::{
        run, workflow, Answer, FakeGit, FakeGitHub, RecordingTelemetry, ScriptedPrompter,
    };
    use base64::prelude::{Engine as _, BASE64_STANDARD};
    use crypto_box::aead::OsRng;
    use crypto_box::SecretKey;
    use gh_client::{GitHubClient, PublicKey};
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Write};
    use std::sync::Arc;

    const CI_PATH: &str = ".github/workflows/ci.yml";
    const CI: &str = r#"name: CI
on:
  push:
    branches: [main]
jobs:
  build:
    runs-on: ubuntu-latest
    steps:
      - run: cargo test
"#;

    struct Fixture {
        github: Arc<FakeGitHub>,
        git: FakeGit,
        telemetry: RecordingTelemetry,
        config: AppConfig,
        session: Session,
        _dir: tempfile::TempDir,
    }

    impl Fixture {
        async fn new(github: FakeGitHub, git: FakeGit) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let config = AppConfig {
                clone_dir: dir.path().to_path_buf(),
                git_user_name: Some("Octo Cat".into()),
                git_user_email: Some("octo@example.com".into()),
                ..AppConfig::default()
            };
            let github = Arc::new(FakeGitHub {
                login: Some("octocat".into()),
                ..github
            });
            let client: Arc<dyn GitHubClient> = github.clone();
            let session = Session::authenticate(client, "ghp_test".into())
                .await
                .unwrap();

            Self {
                github,
                git,
                telemetry: RecordingTelemetry::default(),
                config,
                session,
                _dir: dir,
            }
        }

        async fn run(&self, prompter: &mut ScriptedPrompter, action: Action) -> Result<Continuation> {
            let mut dispatcher = Dispatcher::new(
                &self.session,
                &self.config,
                prompter,
                &self.git,
                &self.telemetry,
            );
            dispatcher.run(&hello(), action).await
        }

        async fn run_session(&self, prompter: &mut ScriptedPrompter) -> Result<()> {
            let mut dispatcher = Dispatcher::new(
                &self.session,
                &self.config,
                prompter,
                &self.git,
                &self.telemetry,
            );
            dispatcher.run_session(hello()).await
        }
    }

    fn hello() -> RepoIdentity {
        RepoIdentity::new("octo", "hello")
    }

    fn with_workflow() -> (FakeGitHub, FakeGit) {
        let github = FakeGitHub {
            workflows: vec![workflow(1, "CI", CI_PATH)],
            ..Default::default()
        };
        (github, FakeGit::with_file(CI_PATH, CI))
    }

    fn runs() -> FakeGitHub {
        FakeGitHub {
            runs: vec![
                run(1, 101, "push", Some("success")),
                run(2, 102, "pull_request", Some("cancelled")),
                run(3, 103, "push", None),
            ],
            ..Default::default()
        }
    }

    fn secret(name: &str) -> Secret {
        Secret {
            name: name.to_string(),
            created_at: "2019-08-10T14:59:22Z".parse().unwrap(),
            updated_at: "2020-01-10T14:59:22Z".parse().unwrap(),
        }
    }

    fn log_archive(files: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in files {
            writer
                .start_file(*name, zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[tokio::test]
    async fn test_exit_stops_without_telemetry() {
        let fx = Fixture::new(FakeGitHub::default(), FakeGit::default()).await;
        let mut prompter = ScriptedPrompter::new([Answer::pick("Exit")]);

        fx.run_session(&mut prompter).await.unwrap();

        assert_eq!(prompter.printed, vec![FAREWELL]);
        assert!(fx.telemetry.events().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_action_is_invalid() {
        let fx = Fixture::new(FakeGitHub::default(), FakeGit::default()).await;
        let mut prompter = ScriptedPrompter::new([Answer::pick("Delete the repo")]);

        let err = fx.run_session(&mut prompter).await.unwrap_err();
        assert!(matches!(err, ManagerError::InvalidAction(_)));
    }

    #[tokio::test]
    async fn test_rename_changes_only_the_name() {
        let (github, git) = with_workflow();
        let fx = Fixture::new(github, git).await;
        let mut prompter = ScriptedPrompter::new([
            Answer::pick(CI_PATH),
            Answer::text(""),
            Answer::text(""),
            Answer::text("Continuous Integration"),
            Answer::Confirm(false),
        ]);

        let next = fx.run(&mut prompter, Action::RenameWorkflow).await.unwrap();
        assert_eq!(next, Continuation::Stop);

        let clones = fx.git.clones.lock().unwrap().clone();
        assert_eq!(
            clones,
            vec!["https://github.com/octo/hello.git"]
        );
        let identities = fx.git.identities.lock().unwrap().clone();
        assert_eq!(
            identities,
            vec![("Octo Cat".to_string(), "octo@example.com".to_string())]
        );

        let pushes = fx.git.pushes();
        assert_eq!(pushes.len(), 1);
        let (file, message, content) = &pushes[0];
        assert_eq!(file, CI_PATH);
        assert_eq!(message, "Update workflow name");

        let before = WorkflowDocument::parse(CI).unwrap();
        let after = WorkflowDocument::parse(content).unwrap();
        assert_eq!(after.name(), Some("Continuous Integration"));
        assert_eq!(after.triggers(), before.triggers());
        assert_eq!(after.jobs(), before.jobs());

        let events = fx.telemetry.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].tags, SUCCESS_TAGS);
        assert_eq!(events[0].metadata["action"], "rename_workflow");
        assert_eq!(events[0].metadata["repo"], "octo/hello");
    }

    fn rename_answers() -> ScriptedPrompter {
        ScriptedPrompter::new([
            Answer::pick(CI_PATH),
            Answer::text(""),
            Answer::text(""),
            Answer::text("Renamed"),
            Answer::Confirm(false),
        ])
    }

    fn assert_working_copy_removed(fx: &Fixture) {
        let roots = fx.git.roots.lock().unwrap().clone();
        assert_eq!(roots.len(), 1);
        assert!(roots[0].starts_with(&fx.config.clone_dir));
        assert!(!roots[0].exists(), "{} left behind", roots[0].display());
        let left = std::fs::read_dir(&fx.config.clone_dir).unwrap().count();
        assert_eq!(left, 0);
    }

    #[tokio::test]
    async fn test_working_copy_removed_after_push() {
        let (github, git) = with_workflow();
        let fx = Fixture::new(github, git).await;
        let mut prompter = rename_answers();

        fx.run(&mut prompter, Action::RenameWorkflow).await.unwrap();

        assert_eq!(fx.git.pushes().len(), 1);
        assert_working_copy_removed(&fx);
    }

    #[tokio::test]
    async fn test_working_copy_removed_after_failed_push() {
        let (github, git) = with_workflow();
        let git = FakeGit {
            fail_push: true,
            ..git
        };
        let fx = Fixture::new(github, git).await;
        let mut prompter = rename_answers();

        let err = fx
            .run(&mut prompter, Action::RenameWorkflow)
            .await
            .unwrap_err();

        assert!(matches!(err, ManagerError::Git { ref command, .. } if command == "push"));
        assert!(fx.telemetry.events().is_empty());
        assert_working_copy_removed(&fx);
    }

    #[tokio::test]
    async fn test_no_workflows_fails_before_any_prompt() {
        let fx = Fixture::new(FakeGitHub::default(), FakeGit::default()).await;
        let mut prompter = ScriptedPrompter::new([]);

        let err = fx
            .run(&mut prompter, Action::RenameWorkflow)
            .await
            .unwrap_err();

        assert!(matches!(err, ManagerError::EmptyResult(_)));
        assert!(prompter.asked.is_empty());
        assert!(fx.git.clones.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_triggers_reprompt_until_one_is_chosen() {
        let (github, git) = with_workflow();
        let fx = Fixture::new(github, git).await;
        let mut prompter = ScriptedPrompter::new([
            Answer::pick(CI_PATH),
            Answer::text(""),
            Answer::text(""),
            Answer::picks(&[]),
            Answer::picks(&["push", "issues"]),
            Answer::Confirm(true),
        ]);

        let next = fx.run(&mut prompter, Action::EditTriggers).await.unwrap();
        assert_eq!(next, Continuation::Continue);

        let warnings = prompter
            .printed
            .iter()
            .filter(|line| line.as_str() == MISSING_TRIGGER)
            .count();
        assert_eq!(warnings, 1);
        assert_eq!(prompter.offered[1], fx.config.triggers);

        let (_, message, content) = fx.git.pushes().remove(0);
        assert_eq!(message, "Update workflow trigger");
        let after = WorkflowDocument::parse(&content).unwrap();
        assert_eq!(
            after.triggers(),
            Some(&serde_yaml::from_str::<serde_yaml::Value>("[push, issues]").unwrap())
        );
        assert_eq!(after.name(), Some("CI"));
    }

    #[tokio::test]
    async fn test_run_logs_offer_completed_runs_only() {
        let github = FakeGitHub {
            logs: log_archive(&[
                ("0_build.txt", "duplicate summary\n"),
                ("build/1_Run tests.txt", "line one\nline two\n"),
            ]),
            ..runs()
        };
        let mut fx = Fixture::new(github, FakeGit::default()).await;
        fx.config.log_chunk_size = 10;
        let label = run_label(&run(1, 101, "push", Some("success")));
        let mut prompter =
            ScriptedPrompter::new([Answer::pick(label.clone()), Answer::Confirm(false)]);

        fx.run(&mut prompter, Action::ShowRunLogs).await.unwrap();

        assert_eq!(
            prompter.offered[0],
            vec![
                label,
                run_label(&run(2, 102, "pull_request", Some("cancelled")))
            ]
        );
        assert_eq!(fx.github.calls(), vec!["logs octo/hello 1"]);
        assert!(prompter.printed.contains(&"📄  build/1_Run tests.txt".to_string()));
        assert!(prompter.printed.contains(&"line one".to_string()));
        assert!(prompter.printed.contains(&"line two".to_string()));
        assert!(!prompter.printed.iter().any(|l| l.contains("duplicate")));
    }

    #[tokio::test]
    async fn test_overlong_log_line_printed_unbroken() {
        let long_line = "x".repeat(25);
        let github = FakeGitHub {
            logs: log_archive(&[(
                "build/1_Run tests.txt",
                format!("short\n{}\nend\n", long_line).as_str(),
            )]),
            ..runs()
        };
        let mut fx = Fixture::new(github, FakeGit::default()).await;
        fx.config.log_chunk_size = 10;
        let label = run_label(&run(1, 101, "push", Some("success")));
        let mut prompter = ScriptedPrompter::new([Answer::pick(label), Answer::Confirm(false)]);

        fx.run(&mut prompter, Action::ShowRunLogs).await.unwrap();

        let header = prompter
            .printed
            .iter()
            .position(|l| l == "📄  build/1_Run tests.txt")
            .unwrap();
        assert_eq!(
            prompter.printed[header + 1..header + 3].join("\n"),
            format!("short\n{}\nend", long_line)
        );
    }

    #[tokio::test]
    async fn test_rerun_offers_cancelled_runs_only() {
        let fx = Fixture::new(runs(), FakeGit::default()).await;
        let label = run_label(&run(2, 102, "pull_request", Some("cancelled")));
        let mut prompter =
            ScriptedPrompter::new([Answer::pick(label.clone()), Answer::Confirm(false)]);

        fx.run(&mut prompter, Action::RerunWorkflow).await.unwrap();

        assert_eq!(prompter.offered, vec![vec![label]]);
        assert_eq!(fx.github.calls(), vec!["rerun octo/hello 2"]);
    }

    #[tokio::test]
    async fn test_rerun_without_cancelled_runs_fails() {
        let github = FakeGitHub {
            runs: vec![run(1, 101, "push", Some("success"))],
            ..Default::default()
        };
        let fx = Fixture::new(github, FakeGit::default()).await;
        let mut prompter = ScriptedPrompter::new([]);

        let err = fx
            .run(&mut prompter, Action::RerunWorkflow)
            .await
            .unwrap_err();
        assert!(matches!(err, ManagerError::EmptyResult(_)));
        assert!(fx.github.calls().is_empty());
    }

    #[tokio::test]
    async fn test_list_secrets() {
        let github = FakeGitHub {
            secrets: vec![secret("API_KEY")].into(),
            ..Default::default()
        };
        let fx = Fixture::new(github, FakeGit::default()).await;
        let mut prompter = ScriptedPrompter::new([
            Answer::pick("List all secrets"),
            Answer::Confirm(false),
        ]);

        fx.run(&mut prompter, Action::ManageSecrets).await.unwrap();

        assert!(prompter.printed.contains(
            &"API_KEY -  Created on: Sat, 10 Aug 2019 14:59:22 GMT - Updated on: Fri, 10 Jan 2020 14:59:22 GMT"
                .to_string()
        ));
    }

    #[tokio::test]
    async fn test_upsert_secret_seals_value() {
        let repo_key = SecretKey::generate(&mut OsRng);
        let github = FakeGitHub {
            public_key: Some(PublicKey {
                key_id: "568250167242549743".into(),
                key: BASE64_STANDARD.encode(repo_key.public_key().as_bytes()),
            }),
            ..Default::default()
        };
        let fx = Fixture::new(github, FakeGit::default()).await;
        let mut prompter = ScriptedPrompter::new([
            Answer::pick("Add or update a secret"),
            Answer::text("DEPLOY_TOKEN"),
            Answer::text("hunter2"),
            Answer::Confirm(false),
        ]);

        fx.run(&mut prompter, Action::ManageSecrets).await.unwrap();

        let stored = fx.github.stored.lock().unwrap().clone();
        assert_eq!(stored.len(), 1);
        let (name, sealed, key_id) = &stored[0];
        assert_eq!(name, "DEPLOY_TOKEN");
        assert_eq!(key_id, "568250167242549743");
        let opened = repo_key
            .unseal(&BASE64_STANDARD.decode(sealed).unwrap())
            .unwrap();
        assert_eq!(opened, b"hunter2");

        let events = serde_json::to_string(&fx.telemetry.events()[0].metadata).unwrap();
        assert!(!events.contains("hunter2"));
        assert!(!prompter.printed.iter().any(|l| l.contains("hunter2")));
    }

    #[tokio::test]
    async fn test_invalid_secret_name_is_asked_again() {
        let repo_key = SecretKey::generate(&mut OsRng);
        let github = FakeGitHub {
            public_key: Some(PublicKey {
                key_id: "568250167242549743".into(),
                key: BASE64_STANDARD.encode(repo_key.public_key().as_bytes()),
            }),
            ..Default::default()
        };
        let fx = Fixture::new(github, FakeGit::default()).await;
        let mut prompter = ScriptedPrompter::new([
            Answer::pick("Add or update a secret"),
            Answer::text("MY SECRET/2"),
            Answer::text("GITHUB_TOKEN"),
            Answer::text("MY_SECRET"),
            Answer::text("value"),
            Answer::Confirm(false),
        ]);

        fx.run(&mut prompter, Action::ManageSecrets).await.unwrap();

        let warnings = prompter
            .printed
            .iter()
            .filter(|l| l.starts_with("❗️  Secret names"))
            .count();
        assert_eq!(warnings, 2);
        assert_eq!(fx.github.calls(), vec!["put octo/hello MY_SECRET"]);
    }

    #[tokio::test]
    async fn test_declined_delete_keeps_secret() {
        let github = FakeGitHub {
            secrets: vec![secret("API_KEY")].into(),
            ..Default::default()
        };
        let fx = Fixture::new(github, FakeGit::default()).await;
        let mut prompter = ScriptedPrompter::new([
            Answer::pick("Delete a secret"),
            Answer::pick("API_KEY"),
            Answer::Confirm(false),
            Answer::Confirm(false),
        ]);

        fx.run(&mut prompter, Action::ManageSecrets).await.unwrap();

        assert!(fx.github.calls().is_empty());
        assert!(prompter
            .printed
            .contains(&"⬜  API_KEY was not removed from the repo!".to_string()));
    }

    #[tokio::test]
    async fn test_confirmed_delete_removes_secret() {
        let github = FakeGitHub {
            secrets: vec![secret("API_KEY"), secret("NPM_TOKEN")].into(),
            ..Default::default()
        };
        let fx = Fixture::new(github, FakeGit::default()).await;
        let mut prompter = ScriptedPrompter::new([
            Answer::pick("Delete a secret"),
            Answer::pick("NPM_TOKEN"),
            Answer::Confirm(true),
            Answer::Confirm(false),
        ]);

        fx.run(&mut prompter, Action::ManageSecrets).await.unwrap();

        assert_eq!(fx.github.calls(), vec!["delete octo/hello NPM_TOKEN"]);
        assert_eq!(prompter.offered[1], vec!["API_KEY", "NPM_TOKEN"]);
    }

    #[tokio::test]
    async fn test_unknown_secret_action_is_invalid() {
        let fx = Fixture::new(FakeGitHub::default(), FakeGit::default()).await;
        let mut prompter = ScriptedPrompter::new([Answer::pick("Rotate a secret")]);

        let err = fx
            .run(&mut prompter, Action::ManageSecrets)
            .await
            .unwrap_err();
        assert!(matches!(err, ManagerError::InvalidAction(_)));
    }

    #[tokio::test]
    async fn test_change_repo_switches_with_next_action() {
        let fx = Fixture::new(FakeGitHub::default(), FakeGit::default()).await;
        let mut prompter = ScriptedPrompter::new([
            Answer::text("https://github.com/other/thing"),
            Answer::pick("Exit"),
        ]);

        let next = fx.run(&mut prompter, Action::ChangeRepo).await.unwrap();
        assert_eq!(
            next,
            Continuation::SwitchRepo {
                repo: RepoIdentity::new("other", "thing"),
                action: Action::Exit,
            }
        );
    }

    #[tokio::test]
    async fn test_session_runs_next_action_on_switched_repo() {
        let fx = Fixture::new(runs(), FakeGit::default()).await;
        let mut prompter = ScriptedPrompter::new([
            Answer::pick("Change Working Repo"),
            Answer::text("git@github.com:other/thing.git"),
            Answer::pick("Re-run a workflow run"),
            Answer::pick(run_label(&run(2, 102, "pull_request", Some("cancelled")))),
            Answer::Confirm(true),
            Answer::pick("Exit"),
        ]);

        fx.run_session(&mut prompter).await.unwrap();

        assert_eq!(fx.github.calls(), vec!["rerun other/thing 2"]);
        assert_eq!(prompter.remaining(), 0);
        assert_eq!(prompter.printed.last().map(String::as_str), Some(FAREWELL));
    }
}
