//! Service layer
//!
//! Status aggregation over a pipeline's workflows and the failure drill-down
//! built on top of it.

mod failures;
mod status;

pub use failures::{ActionFailure, collect_failures, workflow_errors};
pub use status::{JobListing, StatusChecker, WorkflowDetails, WorkflowOutcome, WorkflowsSummary};
