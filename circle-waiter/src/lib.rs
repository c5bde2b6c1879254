//! Waits for CircleCI workflows and reports what failed
//!
//! [`wait_for_jobs`] polls a pipeline until the selected workflows and jobs
//! reach a terminal status. [`workflow_errors`] collects the output of every
//! failed action. Both take a [`CircleClient`](circle_client::CircleClient)
//! and a [`CancellationToken`](tokio_util::sync::CancellationToken) that
//! interrupts any request or backoff sleep in progress.

mod cancel;
pub mod config;
pub mod error;
pub mod filter;
pub mod scheduler;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{WaitForJobsOptions, WorkflowErrorsOptions, WorkflowSelection};
pub use error::{Result, WaiterError};
pub use filter::{JobFilter, WorkflowFilter, deduplicate};
pub use scheduler::{WaitDuration, WaitOutcome, wait_for_jobs};
pub use service::{
    ActionFailure, JobListing, StatusChecker, WorkflowDetails, WorkflowOutcome, WorkflowsSummary,
    collect_failures, workflow_errors,
};
