//! Failure drill-down
//!
//! Turns failed and unfinished jobs into the output of the actions that
//! failed inside them.

use circle_client::CircleClient;
use circle_core::domain::{Job, JobDetails, ProjectSlug, Workflow, concat_output};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cancel::guarded;
use crate::config::WorkflowErrorsOptions;
use crate::error::Result;
use crate::service::{JobListing, StatusChecker, WorkflowsSummary};

/// One failed action and the output it produced
#[derive(Debug, Clone, Serialize)]
pub struct ActionFailure {
    pub workflow: Workflow,
    pub job: Job,
    pub step_name: String,
    pub action_name: String,
    pub message: String,
}

/// Collects the output of every failed action in a pipeline
pub async fn workflow_errors(
    client: &dyn CircleClient,
    options: &WorkflowErrorsOptions,
    cancel: &CancellationToken,
) -> Result<Vec<ActionFailure>> {
    let selection = &options.selection;
    let pipeline_id = guarded(
        cancel,
        client.pipeline_id(&selection.project, selection.pipeline_number),
    )
    .await?;

    let checker = StatusChecker::new(
        selection.workflow_filter(),
        selection.job_filter(),
        JobListing::all(),
    );
    let summary = checker.check(client, &pipeline_id, cancel).await?;

    let failures = collect_failures(client, &selection.project, &summary, cancel).await?;
    info!(
        "Found {} failed action(s) in pipeline {}",
        failures.len(),
        selection.pipeline_number
    );

    Ok(failures)
}

/// Drills into the failed and pending jobs of an existing summary
pub async fn collect_failures(
    client: &dyn CircleClient,
    project: &ProjectSlug,
    summary: &WorkflowsSummary,
    cancel: &CancellationToken,
) -> Result<Vec<ActionFailure>> {
    let mut failures = Vec::new();

    for details in summary.all() {
        for job in details.unsuccessful_jobs() {
            // blocked jobs never started, so there is nothing to fetch
            if job.status.is_blocked() {
                continue;
            }

            let Some(job_number) = job.job_number else {
                debug!("Skipping job {} without a job number", job.name);
                continue;
            };

            let Some(job_details) = job_details(client, project, job_number, cancel).await? else {
                debug!("Job {} ({}) has no details yet, skipping", job.name, job_number);
                continue;
            };

            for (step, action) in job_details.failed_actions() {
                // `has_output` may be absent from the payload; the URL decides
                let message = if action.output_url.is_some() {
                    let output = guarded(cancel, client.action_output(action)).await?;
                    concat_output(&output)
                } else {
                    String::new()
                };

                failures.push(ActionFailure {
                    workflow: details.workflow.clone(),
                    job: job.clone(),
                    step_name: step.name.clone(),
                    action_name: action.name.clone(),
                    message,
                });
            }
        }
    }

    Ok(failures)
}

/// Job details, or `None` when CircleCI has no record of the job yet
async fn job_details(
    client: &dyn CircleClient,
    project: &ProjectSlug,
    job_number: u64,
    cancel: &CancellationToken,
) -> Result<Option<JobDetails>> {
    match guarded(cancel, client.job_details(project, job_number)).await {
        Ok(details) => Ok(Some(details)),
        Err(crate::WaiterError::Client(err)) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}
