//! Commands module
//!
//! Defines all CLI commands, the workflow selection flags they share, and
//! how their results map to exit codes.

mod wait_for_jobs;
mod workflow_errors;

pub use wait_for_jobs::WaitForJobsArgs;
pub use workflow_errors::WorkflowErrorsArgs;

use anyhow::{Result, bail};
use circle_core::domain::ProjectSlug;
use circle_waiter::WorkflowSelection;
use clap::{Args, Subcommand};
use std::io;
use std::process::ExitCode;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::config::Config;
use crate::parse::{comma_separated_list, parse_duration};

/// How a command ended, short of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    /// Pipeline failed and `--fail-on-error` was set
    PipelineFailed,
    /// Timed out or interrupted before the result was known
    Canceled,
}

impl From<CommandStatus> for ExitCode {
    fn from(status: CommandStatus) -> Self {
        match status {
            CommandStatus::Success => ExitCode::SUCCESS,
            CommandStatus::PipelineFailed => ExitCode::from(2),
            CommandStatus::Canceled => ExitCode::from(3),
        }
    }
}

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Wait for other jobs or workflows in the same pipeline to finish
    ///
    /// Example: circleci-helper wait-for-jobs --org myorg --project myproject
    /// --pipeline-number 42 --workflow build --exclude finalize
    WaitForJobs(WaitForJobsArgs),

    /// Report the output of every failed step in a pipeline
    ///
    /// Example: circleci-helper workflow-errors --org myorg --project myproject
    /// --pipeline-number 42 --workflow build
    WorkflowErrors(WorkflowErrorsArgs),
}

/// Flags shared by every workflow-related command
#[derive(Args, Debug, Clone)]
pub struct WorkflowArgs {
    /// Pipeline number
    #[arg(long, default_value_t = 0)]
    pub pipeline_number: u64,

    /// Project type (i.e. github)
    #[arg(long, default_value = "github")]
    pub project_type: String,

    /// Organization
    #[arg(long, default_value = "")]
    pub org: String,

    /// Project
    #[arg(long, default_value = "")]
    pub project: String,

    /// Workflow names to limit to, comma separated list
    #[arg(long, default_value = "")]
    pub workflow: String,

    /// Job or jobs to exclude, comma separated list
    #[arg(long, default_value = "")]
    pub exclude: String,

    /// Job prefix or prefixes to limit to, comma separated list
    #[arg(long, default_value = "")]
    pub job_prefix: String,

    /// Give up after this long (e.g. 90s, 15m, 1h)
    #[arg(long, default_value = "15m", value_parser = parse_duration)]
    pub timeout: Duration,
}

impl WorkflowArgs {
    pub fn validate(&self) -> Result<()> {
        if self.org.trim().is_empty() {
            bail!("org must be specified");
        }
        if self.project.trim().is_empty() {
            bail!("project must be specified");
        }
        if self.pipeline_number == 0 {
            bail!("pipeline-number must be specified");
        }
        Ok(())
    }

    pub fn project_slug(&self) -> ProjectSlug {
        ProjectSlug::new(&self.project_type, &self.org, &self.project)
    }

    pub fn selection(&self) -> WorkflowSelection {
        let mut selection = WorkflowSelection::new(self.project_slug(), self.pipeline_number);
        selection.workflow_names = comma_separated_list(&self.workflow);
        selection.exclude_job_names = comma_separated_list(&self.exclude);
        selection.job_prefixes = comma_separated_list(&self.job_prefix);
        selection
    }
}

/// Handle a CLI command
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
///
/// # Returns
/// How the command ended; `Err` means exit code 1
pub async fn handle_command(command: Commands, config: &Config) -> Result<CommandStatus> {
    match command {
        Commands::WaitForJobs(args) => wait_for_jobs::handle_wait_for_jobs(args, config).await,
        Commands::WorkflowErrors(args) => {
            workflow_errors::handle_workflow_errors(args, config).await
        }
    }
}

/// Token that fires after `timeout` or on Ctrl-C, whichever comes first
fn cancel_after(timeout: Duration) -> CancellationToken {
    cancel_on(timeout, tokio::signal::ctrl_c())
}

/// Token that fires after `timeout` or once `interrupt` resolves with `Ok`
///
/// An `Err` from `interrupt` means no handler could be installed; the timeout
/// still applies.
fn cancel_on<F>(timeout: Duration, interrupt: F) -> CancellationToken
where
    F: Future<Output = io::Result<()>> + Send + 'static,
{
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();

    tokio::spawn(async move {
        let interrupted = async {
            match interrupt.await {
                Ok(()) => {}
                Err(e) => {
                    warn!("Unable to listen for Ctrl-C: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        tokio::select! {
            _ = tokio::time::sleep(timeout) => warn!("Timed out after {:?}", timeout),
            _ = interrupted => warn!("Interrupted"),
            _ = trigger.cancelled() => return,
        }
        trigger.cancel();
    });

    cancel
}
