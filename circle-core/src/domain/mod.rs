//! Core domain types
//!
//! Immutable snapshots of pipeline state fetched from CircleCI. Every poll
//! cycle builds these fresh from API responses; nothing here is cached
//! across cycles.

pub mod details;
pub mod job;
pub mod pipeline;
pub mod workflow;

pub use details::{JobAction, JobDetails, JobStep, OutputMessage, concat_output};
pub use job::{Job, JobStatus};
pub use pipeline::{Pipeline, ProjectSlug};
pub use workflow::{Workflow, WorkflowStatus};
