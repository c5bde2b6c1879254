//! workflow-errors command
//!
//! Prints the output of every failed action in the selected workflows.

use anyhow::{Context, Result};
use circle_client::CircleClient;
use circle_waiter::{ActionFailure, WaiterError, WorkflowErrorsOptions, workflow_errors};
use clap::Args;
use colored::*;
use std::io::Write;
use tokio_util::sync::CancellationToken;

use super::{CommandStatus, WorkflowArgs, cancel_after};
use crate::config::Config;

#[derive(Args, Debug, Clone)]
pub struct WorkflowErrorsArgs {
    #[command(flatten)]
    pub workflow: WorkflowArgs,

    /// Print failures as a JSON array instead of text
    #[arg(long)]
    pub json: bool,
}

/// Handle the workflow-errors command
pub async fn handle_workflow_errors(
    args: WorkflowErrorsArgs,
    config: &Config,
) -> Result<CommandStatus> {
    args.workflow.validate()?;
    let client = config.client()?;

    let cancel = cancel_after(args.workflow.timeout);
    let mut stdout = std::io::stdout();
    let status = run(&client, &args, &cancel, &mut stdout).await;
    cancel.cancel();
    status
}

async fn run(
    client: &dyn CircleClient,
    args: &WorkflowErrorsArgs,
    cancel: &CancellationToken,
    out: &mut impl Write,
) -> Result<CommandStatus> {
    let options = WorkflowErrorsOptions::new(args.workflow.selection());

    let failures = match workflow_errors(client, &options, cancel).await {
        Ok(failures) => failures,
        Err(WaiterError::Canceled) => {
            eprintln!("{}", "Gave up collecting workflow errors".red());
            return Ok(CommandStatus::Canceled);
        }
        Err(e) => return Err(e).context("Failed to retrieve workflow errors"),
    };

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &failures)
            .context("Failed to serialize workflow errors")?;
        writeln!(out)?;
        return Ok(CommandStatus::Success);
    }

    if failures.is_empty() {
        eprintln!("{}", "No failed actions found.".yellow());
    }
    for failure in &failures {
        write!(out, "{}", format_failure(failure))?;
    }

    Ok(CommandStatus::Success)
}

fn format_failure(failure: &ActionFailure) -> String {
    format!(
        "Failed to run workflow {} job {} at step {} action {}:\n{}\n\n----\n",
        failure.workflow.name,
        failure.job.name,
        failure.step_name,
        failure.action_name,
        failure.message
    )
}
