//! wait-for-jobs command
//!
//! Blocks until the selected workflows and jobs finish, then optionally
//! prints a report of what failed.

use anyhow::{Context, Result, anyhow};
use circle_client::CircleClient;
use circle_core::domain::ProjectSlug;
use circle_waiter::{
    WaitDuration, WaitForJobsOptions, WaiterError, WorkflowSelection, WorkflowsSummary,
    wait_for_jobs,
};
use clap::Args;
use colored::*;
use reqwest::Url;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::{CommandStatus, WorkflowArgs, cancel_after};
use crate::config::Config;
use crate::parse::parse_duration;

const APP_URL: &str = "https://app.circleci.com/pipelines";

#[derive(Args, Debug, Clone)]
pub struct WaitForJobsArgs {
    #[command(flatten)]
    pub workflow: WorkflowArgs,

    /// Print human-friendly details about failed workflows and exit with code 2
    #[arg(long)]
    pub fail_on_error: bool,

    /// Message printed before the report of failed workflows
    #[arg(long, default_value = "")]
    pub fail_header: String,

    /// Message printed after the report of failed workflows
    #[arg(long, default_value = "")]
    pub fail_footer: String,

    /// Time between polls; doubled while 3 or more jobs are pending
    #[arg(long, default_value = "10s", value_parser = parse_duration)]
    pub wait_time: Duration,
}

impl WaitForJobsArgs {
    fn validate(&self) -> Result<()> {
        self.workflow.validate()?;
        if self.wait_time.is_zero() {
            anyhow::bail!("wait-time must be greater than zero");
        }
        Ok(())
    }

    fn options(&self) -> WaitForJobsOptions {
        let mut options = WaitForJobsOptions::new(self.workflow.selection());
        options.fail_on_error = self.fail_on_error;
        options.wait_duration = WaitDuration::new(self.wait_time);
        options
    }
}

/// Handle the wait-for-jobs command
pub async fn handle_wait_for_jobs(args: WaitForJobsArgs, config: &Config) -> Result<CommandStatus> {
    args.validate()?;
    let client = config.client()?;

    let cancel = cancel_after(args.workflow.timeout);
    let status = run(&client, &args, &cancel).await;
    // stops the timeout task
    cancel.cancel();
    status
}

async fn run(
    client: &dyn CircleClient,
    args: &WaitForJobsArgs,
    cancel: &CancellationToken,
) -> Result<CommandStatus> {
    let options = args.options();

    let outcome = match wait_for_jobs(client, &options, cancel).await {
        Ok(outcome) => outcome,
        Err(WaiterError::Canceled) => {
            eprintln!(
                "{}",
                format!(
                    "Gave up waiting for pipeline {} before all workflows finished",
                    options.selection.pipeline_number
                )
                .red()
            );
            return Ok(CommandStatus::Canceled);
        }
        Err(e) => return Err(e).context("Failed to wait for jobs"),
    };

    if !outcome.failed() {
        info!("all workflows and jobs finished successfully");
        return Ok(CommandStatus::Success);
    }

    error!("one or more workflows or jobs failed");
    if !args.fail_on_error {
        return Ok(CommandStatus::Success);
    }

    print!(
        "{}",
        fail_report(
            &args.fail_header,
            &args.fail_footer,
            &options.selection,
            outcome.summary()
        )?
    );
    Ok(CommandStatus::PipelineFailed)
}

/// Banner listing failed workflows and running workflows with a failed job
fn fail_report(
    header: &str,
    footer: &str,
    selection: &WorkflowSelection,
    summary: &WorkflowsSummary,
) -> Result<String> {
    let rule = "#".repeat(98);
    let mut report = format!("\n\n{}\n\n{}\n\n", rule, header);

    let reported = summary.failed_workflows().chain(
        summary
            .pending_workflows()
            .filter(|details| !details.failed_jobs.is_empty()),
    );
    for details in reported {
        let url = workflow_url(
            &selection.project,
            selection.pipeline_number,
            &details.workflow.id,
        )?;
        report.push_str(&format!("  - {} ( {} )\n", details.workflow.name, url));
    }

    report.push_str(&format!("\n\n{}\n\n{}\n", footer, rule));
    Ok(report)
}

/// Web UI link for a workflow
fn workflow_url(project: &ProjectSlug, pipeline_number: u64, workflow_id: &str) -> Result<String> {
    let mut url = Url::parse(APP_URL)?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("{} cannot have path segments", APP_URL))?
        .push(&project.project_type)
        .push(&project.org)
        .push(&project.project)
        .push(&pipeline_number.to_string())
        .push("workflows")
        .push(workflow_id);
    Ok(url.to_string())
}
