//! Waiter options
//!
//! Immutable option structs passed by value into the entry points. The CLI
//! builds these from its arguments; nothing here is process-wide.

use circle_core::domain::ProjectSlug;
use std::time::Duration;

use crate::filter::{JobFilter, WorkflowFilter};
use crate::scheduler::WaitDuration;
use crate::service::JobListing;

/// Which pipeline, workflows and jobs to look at
#[derive(Debug, Clone)]
pub struct WorkflowSelection {
    /// Project the pipeline belongs to
    pub project: ProjectSlug,

    /// Pipeline number within the project
    pub pipeline_number: u64,

    /// Workflow names to limit to; empty means all workflows
    pub workflow_names: Vec<String>,

    /// Job names to ignore
    pub exclude_job_names: Vec<String>,

    /// Job name prefixes to limit to; empty means all jobs
    pub job_prefixes: Vec<String>,
}

impl WorkflowSelection {
    pub fn new(project: ProjectSlug, pipeline_number: u64) -> Self {
        Self {
            project,
            pipeline_number,
            workflow_names: Vec::new(),
            exclude_job_names: Vec::new(),
            job_prefixes: Vec::new(),
        }
    }

    pub fn workflow_filter(&self) -> WorkflowFilter {
        WorkflowFilter::new(self.workflow_names.iter().cloned())
    }

    pub fn job_filter(&self) -> JobFilter {
        JobFilter::new(
            self.exclude_job_names.iter().cloned(),
            self.job_prefixes.iter().cloned(),
        )
    }
}

/// Options for waiting until selected workflows and jobs finish
#[derive(Debug, Clone)]
pub struct WaitForJobsOptions {
    pub selection: WorkflowSelection,

    /// Stop as soon as anything failed, even if other jobs are still running
    pub fail_on_error: bool,

    /// Which workflow buckets get their jobs listed each cycle
    pub job_listing: JobListing,

    /// Backoff between polls
    pub wait_duration: WaitDuration,
}

impl WaitForJobsOptions {
    /// Creates options with the default 10 second poll interval
    pub fn new(selection: WorkflowSelection) -> Self {
        Self {
            selection,
            fail_on_error: false,
            job_listing: JobListing::default(),
            wait_duration: WaitDuration::new(Duration::from_secs(10)),
        }
    }
}

/// Options for collecting failing action output
#[derive(Debug, Clone)]
pub struct WorkflowErrorsOptions {
    pub selection: WorkflowSelection,
}

impl WorkflowErrorsOptions {
    pub fn new(selection: WorkflowSelection) -> Self {
        Self { selection }
    }
}
