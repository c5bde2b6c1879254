//! Workflow poller
//!
//! Resolves the pipeline once, then classifies its workflows on every cycle
//! until they are done or a failure ends the wait early.

use circle_client::CircleClient;
use tokio_util::sync::CancellationToken;
use tracing::{Level, debug, error, info, warn};

use crate::cancel::{guarded, sleep};
use crate::config::WaitForJobsOptions;
use crate::error::Result;
use crate::service::{StatusChecker, WorkflowsSummary};

/// How a wait ended
#[derive(Debug, Clone)]
pub enum WaitOutcome {
    /// Every selected workflow and job reached a terminal status
    Finished(WorkflowsSummary),

    /// Something failed while other jobs were still running
    FailedEarly(WorkflowsSummary),
}

impl WaitOutcome {
    pub fn summary(&self) -> &WorkflowsSummary {
        match self {
            WaitOutcome::Finished(summary) | WaitOutcome::FailedEarly(summary) => summary,
        }
    }

    pub fn into_summary(self) -> WorkflowsSummary {
        match self {
            WaitOutcome::Finished(summary) | WaitOutcome::FailedEarly(summary) => summary,
        }
    }

    pub fn failed(&self) -> bool {
        self.summary().failed
    }
}

/// Waits until the selected workflows and jobs finish
///
/// # Arguments
/// * `client` - CircleCI client
/// * `options` - Pipeline, filters and polling behavior
/// * `cancel` - Ends the wait with [`WaiterError::Canceled`](crate::WaiterError::Canceled)
pub async fn wait_for_jobs(
    client: &dyn CircleClient,
    options: &WaitForJobsOptions,
    cancel: &CancellationToken,
) -> Result<WaitOutcome> {
    let selection = &options.selection;
    let pipeline_id = guarded(
        cancel,
        client.pipeline_id(&selection.project, selection.pipeline_number),
    )
    .await?;

    info!(
        "Waiting for pipeline {} of {} (id: {})",
        selection.pipeline_number, selection.project, pipeline_id
    );

    let checker = StatusChecker::new(
        selection.workflow_filter(),
        selection.job_filter(),
        options.job_listing,
    );

    loop {
        let summary = checker.check(client, &pipeline_id, cancel).await?;
        log_summary(&summary);

        if summary.finished {
            return Ok(WaitOutcome::Finished(summary));
        }

        if summary.failed && options.fail_on_error {
            warn!("Failure detected while jobs are still running, not waiting for the rest");
            return Ok(WaitOutcome::FailedEarly(summary));
        }

        let wait = options
            .wait_duration
            .for_pending_jobs(summary.pending_job_count());
        warn!("Not all workflows / jobs have finished, waiting {:?}", wait);
        sleep(cancel, wait).await?;
    }
}

fn log_summary(summary: &WorkflowsSummary) {
    for (level, line) in summary_lines(summary) {
        match level {
            Level::ERROR => error!("{}", line),
            Level::WARN => warn!("{}", line),
            Level::DEBUG => debug!("{}", line),
            _ => info!("{}", line),
        }
    }
}

/// One line per workflow and per listed job, every bucket included
fn summary_lines(summary: &WorkflowsSummary) -> Vec<(Level, String)> {
    let mut lines = Vec::new();
    if summary.all().is_empty() && !summary.finished {
        lines.push((Level::DEBUG, "No workflows to report yet".to_string()));
        return lines;
    }

    for details in summary.succeeded_workflows() {
        lines.push((
            Level::INFO,
            format!("workflow {} succeeded", details.workflow.name),
        ));
    }

    for details in summary.failed_workflows() {
        lines.push((
            Level::ERROR,
            format!(
                "workflow {} failed (status: {})",
                details.workflow.name, details.workflow.status
            ),
        ));
        for job in &details.failed_jobs {
            lines.push((
                Level::ERROR,
                format!(
                    "workflow {} job {} failed (status: {})",
                    details.workflow.name, job.name, job.status
                ),
            ));
        }
    }

    for details in summary.pending_workflows() {
        lines.push((
            Level::WARN,
            format!(
                "workflow {} has not finished yet (status: {})",
                details.workflow.name, details.workflow.status
            ),
        ));
        for job in &details.succeeded_jobs {
            lines.push((
                Level::INFO,
                format!(
                    "workflow {} job {} finished (status: {})",
                    details.workflow.name, job.name, job.status
                ),
            ));
        }
        for job in &details.failed_jobs {
            lines.push((
                Level::ERROR,
                format!(
                    "workflow {} job {} failed (status: {})",
                    details.workflow.name, job.name, job.status
                ),
            ));
        }
        for job in &details.pending_jobs {
            lines.push((
                Level::WARN,
                format!(
                    "workflow {} job {} not yet finished (status: {})",
                    details.workflow.name, job.name, job.status
                ),
            ));
        }
    }

    lines
}
