//! Workflow domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single workflow attempt within a pipeline
///
/// Rerunning a workflow creates a new attempt with a new `id` and the same
/// `name`, so only `id` identifies an attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: String,
    pub name: String,
    pub status: WorkflowStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub stopped_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pipeline_number: Option<u64>,
}

impl Workflow {
    /// Returns whether the workflow is no longer in progress
    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Returns whether the workflow ended in any failure state
    pub fn is_failed(&self) -> bool {
        self.status.is_failed()
    }
}

/// Workflow status as reported by CircleCI
///
/// Unknown values are kept verbatim in `Other` and classified as pending.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkflowStatus {
    Success,
    Running,
    NotRun,
    Failed,
    Error,
    Failing,
    OnHold,
    Canceled,
    Unauthorized,
    Other(String),
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &str {
        match self {
            WorkflowStatus::Success => "success",
            WorkflowStatus::Running => "running",
            WorkflowStatus::NotRun => "not_run",
            WorkflowStatus::Failed => "failed",
            WorkflowStatus::Error => "error",
            WorkflowStatus::Failing => "failing",
            WorkflowStatus::OnHold => "on_hold",
            WorkflowStatus::Canceled => "canceled",
            WorkflowStatus::Unauthorized => "unauthorized",
            WorkflowStatus::Other(raw) => raw,
        }
    }

    /// Terminal states: success plus every failure state
    pub fn is_finished(&self) -> bool {
        matches!(self, WorkflowStatus::Success) || self.is_failed()
    }

    /// `failing` is not terminal: the workflow still has running jobs.
    pub fn is_failed(&self) -> bool {
        matches!(
            self,
            WorkflowStatus::Failed
                | WorkflowStatus::Error
                | WorkflowStatus::Canceled
                | WorkflowStatus::Unauthorized
        )
    }
}

impl From<&str> for WorkflowStatus {
    fn from(value: &str) -> Self {
        match value {
            "success" => WorkflowStatus::Success,
            "running" => WorkflowStatus::Running,
            "not_run" => WorkflowStatus::NotRun,
            "failed" => WorkflowStatus::Failed,
            "error" => WorkflowStatus::Error,
            "failing" => WorkflowStatus::Failing,
            "on_hold" => WorkflowStatus::OnHold,
            "canceled" => WorkflowStatus::Canceled,
            "unauthorized" => WorkflowStatus::Unauthorized,
            other => WorkflowStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for WorkflowStatus {
    fn from(value: String) -> Self {
        WorkflowStatus::from(value.as_str())
    }
}

impl From<WorkflowStatus> for String {
    fn from(status: WorkflowStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_status_classification() {
        assert!(WorkflowStatus::Success.is_finished());
        assert!(!WorkflowStatus::Success.is_failed());

        for status in ["failed", "error", "canceled", "unauthorized"] {
            let status = WorkflowStatus::from(status);
            assert!(status.is_finished(), "{} should be finished", status);
            assert!(status.is_failed(), "{} should be failed", status);
        }

        for status in ["running", "on_hold", "failing", "not_run", "something-new"] {
            let status = WorkflowStatus::from(status);
            assert!(!status.is_finished(), "{} should be pending", status);
            assert!(!status.is_failed(), "{} should not be failed", status);
        }
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let status = WorkflowStatus::from("paused");
        assert_eq!(status, WorkflowStatus::Other("paused".to_string()));
        assert_eq!(status.to_string(), "paused");
    }

    #[test]
    fn test_workflow_deserialization() {
        let workflow: Workflow = serde_json::from_str(
            r#"{
                "id": "fda08377-fe7e-46b1-8992-3a7aaecac9c3",
                "name": "build-and-test",
                "status": "on_hold",
                "created_at": "2021-01-02T00:00:00.000Z",
                "stopped_at": null,
                "pipeline_id": "5034460f-c7c4-4c43-9457-de07e2029e7b",
                "pipeline_number": 25
            }"#,
        )
        .unwrap();

        assert_eq!(workflow.name, "build-and-test");
        assert_eq!(workflow.status, WorkflowStatus::OnHold);
        assert_eq!(workflow.pipeline_number, Some(25));
        assert!(workflow.stopped_at.is_none());
        assert!(!workflow.is_finished());
    }

    #[test]
    fn test_status_serializes_to_wire_string() {
        let json = serde_json::to_string(&WorkflowStatus::OnHold).unwrap();
        assert_eq!(json, r#""on_hold""#);
    }
}
