//! gh-actions-manager
//!
//! Interactive terminal tool for the GitHub Actions of one repository at a
//! time: rename workflows, change their triggers, read run logs, re-run
//! cancelled runs and manage repository secrets.

use clap::Parser;
use gh_actions_config::AppConfig;
use gh_client::TokenResolver;
use std::path::PathBuf;
use std::process::ExitCode;

mod actions;
mod dispatcher;
mod error;
mod git;
mod logger;
mod prompt;
mod repo;
mod secrets;
mod selection;
mod session;
mod telemetry;
mod workflow;

#[cfg(test)]
mod testing;

use dispatcher::Dispatcher;
use error::{ManagerError, Result};
use git::LocalGit;
use prompt::{Prompter, TerminalPrompter};
use repo::RepoIdentity;
use telemetry::{LogTelemetry, Telemetry};

const BANNER: &str = "🚀  GitHub Actions Manager 🙌";

#[derive(Debug, Parser)]
#[command(name = "gh-actions-manager", version, about)]
struct Cli {
    /// Repository to start with, e.g. https://github.com/owner/repo
    #[arg(long, value_name = "URL")]
    repo_url: Option<String>,

    /// Config file to use instead of the default locations
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match logger::init() {
        Ok(path) => log::info!("Logging to {}", path.display()),
        Err(e) => eprintln!("Logging disabled: {:#}", e),
    }
    log::info!("Starting gh-actions-manager {}", env!("CARGO_PKG_VERSION"));

    let telemetry = LogTelemetry;
    let mut prompter = TerminalPrompter::stdio();

    let code = match run(cli, &mut prompter, &telemetry).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("Exiting after error: {}", err);
            telemetry::track_error(&telemetry, &err);
            if prompter.print(&err.user_message()).is_err() {
                eprintln!("{}", err.user_message());
            }
            ExitCode::FAILURE
        }
    };

    log::info!("Exiting gh-actions-manager");
    code
}

async fn run(cli: Cli, prompter: &mut dyn Prompter, telemetry: &dyn Telemetry) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())
        .map_err(|e| ManagerError::Config(format!("{:#}", e)))?;

    prompter.print(BANNER)?;
    let session = session::bootstrap(prompter, &TokenResolver::new()).await?;

    let repo = match cli.repo_url.as_deref() {
        Some(url) => RepoIdentity::resolve(url)?,
        None => repo::prompt_repo(prompter)?,
    };
    log::info!("Managing {} as {}", repo, session.username());

    let git = LocalGit::new(session.token());
    Dispatcher::new(&session, &config, prompter, &git, telemetry)
        .run_session(repo)
        .await
}
