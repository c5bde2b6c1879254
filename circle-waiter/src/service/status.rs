//! Status aggregation
//!
//! Walks the latest attempt of every selected workflow, lists jobs where the
//! listing policy asks for it, and sorts workflows and jobs into succeeded,
//! failed and pending buckets.

use circle_client::CircleClient;
use circle_core::domain::{Job, Workflow};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cancel::guarded;
use crate::error::Result;
use crate::filter::{JobFilter, WorkflowFilter, deduplicate};

/// Which workflow buckets get their jobs listed
///
/// Listing jobs costs one request per workflow, so finished workflows are
/// skipped unless asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobListing {
    pub succeeded: bool,
    pub failed: bool,
    pub pending: bool,
}

impl JobListing {
    /// List jobs for every workflow
    pub fn all() -> Self {
        Self {
            succeeded: true,
            failed: true,
            pending: true,
        }
    }

    /// List nothing; pending workflows then always count as unfinished
    pub fn none() -> Self {
        Self {
            succeeded: false,
            failed: false,
            pending: false,
        }
    }

    fn lists(&self, outcome: WorkflowOutcome) -> bool {
        match outcome {
            WorkflowOutcome::Succeeded => self.succeeded,
            WorkflowOutcome::Failed => self.failed,
            WorkflowOutcome::Pending => self.pending,
        }
    }
}

impl Default for JobListing {
    fn default() -> Self {
        Self {
            succeeded: false,
            failed: false,
            pending: true,
        }
    }
}

/// Bucket a workflow was sorted into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowOutcome {
    Succeeded,
    Failed,
    Pending,
}

impl WorkflowOutcome {
    fn of(workflow: &Workflow) -> Self {
        if !workflow.is_finished() {
            WorkflowOutcome::Pending
        } else if workflow.is_failed() {
            WorkflowOutcome::Failed
        } else {
            WorkflowOutcome::Succeeded
        }
    }
}

/// A workflow with its jobs sorted by status
///
/// The job lists are only populated when `jobs_listed` is set.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowDetails {
    pub workflow: Workflow,
    pub outcome: WorkflowOutcome,
    pub jobs_listed: bool,
    pub succeeded_jobs: Vec<Job>,
    pub failed_jobs: Vec<Job>,
    pub pending_jobs: Vec<Job>,
}

impl WorkflowDetails {
    fn new(workflow: Workflow) -> Self {
        Self {
            outcome: WorkflowOutcome::of(&workflow),
            workflow,
            jobs_listed: false,
            succeeded_jobs: Vec::new(),
            failed_jobs: Vec::new(),
            pending_jobs: Vec::new(),
        }
    }

    fn add_job(&mut self, job: Job) {
        if !job.is_finished() {
            self.pending_jobs.push(job);
        } else if job.is_failed() {
            self.failed_jobs.push(job);
        } else {
            self.succeeded_jobs.push(job);
        }
    }

    /// Failed and still pending jobs, in that order
    pub fn unsuccessful_jobs(&self) -> impl Iterator<Item = &Job> {
        self.failed_jobs.iter().chain(self.pending_jobs.iter())
    }
}

/// Result of one classification pass over a pipeline
///
/// An empty summary with `finished == false` means not every requested
/// workflow has been created yet.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkflowsSummary {
    pub finished: bool,
    pub failed: bool,
    workflows: Vec<WorkflowDetails>,
}

impl WorkflowsSummary {
    /// Every selected workflow in encounter order
    pub fn all(&self) -> &[WorkflowDetails] {
        &self.workflows
    }

    pub fn succeeded_workflows(&self) -> impl Iterator<Item = &WorkflowDetails> {
        self.with_outcome(WorkflowOutcome::Succeeded)
    }

    pub fn failed_workflows(&self) -> impl Iterator<Item = &WorkflowDetails> {
        self.with_outcome(WorkflowOutcome::Failed)
    }

    pub fn pending_workflows(&self) -> impl Iterator<Item = &WorkflowDetails> {
        self.with_outcome(WorkflowOutcome::Pending)
    }

    /// Pending jobs across all pending workflows
    pub fn pending_job_count(&self) -> usize {
        self.pending_workflows().map(|d| d.pending_jobs.len()).sum()
    }

    fn with_outcome(&self, outcome: WorkflowOutcome) -> impl Iterator<Item = &WorkflowDetails> {
        self.workflows.iter().filter(move |d| d.outcome == outcome)
    }
}

/// Classifies the workflows of a pipeline
#[derive(Debug, Clone)]
pub struct StatusChecker {
    workflow_filter: WorkflowFilter,
    job_filter: JobFilter,
    listing: JobListing,
}

impl StatusChecker {
    pub fn new(workflow_filter: WorkflowFilter, job_filter: JobFilter, listing: JobListing) -> Self {
        Self {
            workflow_filter,
            job_filter,
            listing,
        }
    }

    /// Runs one classification pass
    ///
    /// # Arguments
    /// * `client` - CircleCI client
    /// * `pipeline_id` - Resolved pipeline ID
    /// * `cancel` - Aborts in-flight requests when fired
    pub async fn check(
        &self,
        client: &dyn CircleClient,
        pipeline_id: &str,
        cancel: &CancellationToken,
    ) -> Result<WorkflowsSummary> {
        let workflows = self.latest_workflows(client, pipeline_id, cancel).await?;

        // CircleCI creates workflow objects lazily; until every requested one
        // exists the pipeline cannot be considered finished
        if workflows.len() < self.workflow_filter.requested() {
            debug!(
                "Only {} of {} requested workflows reported so far",
                workflows.len(),
                self.workflow_filter.requested()
            );
            return Ok(WorkflowsSummary::default());
        }

        let mut summary = WorkflowsSummary {
            finished: true,
            ..Default::default()
        };

        for workflow in workflows {
            let details = self.workflow_details(client, workflow, cancel).await?;

            match details.outcome {
                WorkflowOutcome::Failed => summary.failed = true,
                WorkflowOutcome::Pending => {
                    // without job listings a pending workflow cannot be proven done
                    if !details.jobs_listed || !details.pending_jobs.is_empty() {
                        summary.finished = false;
                    }
                }
                WorkflowOutcome::Succeeded => {}
            }

            if !details.failed_jobs.is_empty() {
                summary.failed = true;
            }

            summary.workflows.push(details);
        }

        Ok(summary)
    }

    /// Latest attempt of every workflow that passes the filter
    async fn latest_workflows(
        &self,
        client: &dyn CircleClient,
        pipeline_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Workflow>> {
        let all = guarded(cancel, client.workflows(pipeline_id)).await?;

        Ok(deduplicate(all)
            .into_iter()
            .filter(|workflow| self.workflow_filter.matches(workflow))
            .collect())
    }

    async fn workflow_details(
        &self,
        client: &dyn CircleClient,
        workflow: Workflow,
        cancel: &CancellationToken,
    ) -> Result<WorkflowDetails> {
        let mut details = WorkflowDetails::new(workflow);

        if self.listing.lists(details.outcome) {
            let jobs = guarded(cancel, client.workflow_jobs(&details.workflow.id)).await?;
            details.jobs_listed = true;
            for job in jobs.into_iter().filter(|job| self.job_filter.matches(job)) {
                details.add_job(job);
            }
        }

        Ok(details)
    }
}
