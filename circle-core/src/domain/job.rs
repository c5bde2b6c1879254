//! Job domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// A job within a workflow
///
/// `id` and `job_number` are absent for jobs that have not been scheduled
/// yet (e.g. blocked behind another job or waiting on an approval).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub job_number: Option<u64>,
    pub name: String,
    pub status: JobStatus,
}

impl Job {
    /// Returns whether the job is no longer in progress
    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Returns whether the job has failed
    pub fn is_failed(&self) -> bool {
        self.status.is_failed()
    }
}

/// Job status as reported by CircleCI
///
/// Only `success` and `failed` are treated as terminal; every other value,
/// including unknown ones kept in `Other`, counts as pending.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Success,
    Running,
    NotRun,
    Failed,
    Retried,
    Queued,
    NotRunning,
    InfrastructureFail,
    TimedOut,
    OnHold,
    TerminatedUnknown,
    Blocked,
    Canceled,
    Unauthorized,
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Success => "success",
            JobStatus::Running => "running",
            JobStatus::NotRun => "not_run",
            JobStatus::Failed => "failed",
            JobStatus::Retried => "retried",
            JobStatus::Queued => "queued",
            JobStatus::NotRunning => "not_running",
            JobStatus::InfrastructureFail => "infrastructure_fail",
            JobStatus::TimedOut => "timedout",
            JobStatus::OnHold => "on_hold",
            JobStatus::TerminatedUnknown => "terminated-unknown",
            JobStatus::Blocked => "blocked",
            JobStatus::Canceled => "canceled",
            JobStatus::Unauthorized => "unauthorized",
            JobStatus::Other(raw) => raw,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, JobStatus::Success | JobStatus::Failed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, JobStatus::Failed)
    }

    /// Blocked jobs never produce step data
    pub fn is_blocked(&self) -> bool {
        matches!(self, JobStatus::Blocked)
    }
}

impl From<&str> for JobStatus {
    fn from(value: &str) -> Self {
        match value {
            "success" => JobStatus::Success,
            "running" => JobStatus::Running,
            "not_run" => JobStatus::NotRun,
            "failed" => JobStatus::Failed,
            "retried" => JobStatus::Retried,
            "queued" => JobStatus::Queued,
            "not_running" => JobStatus::NotRunning,
            "infrastructure_fail" => JobStatus::InfrastructureFail,
            "timedout" => JobStatus::TimedOut,
            "on_hold" => JobStatus::OnHold,
            "terminated-unknown" => JobStatus::TerminatedUnknown,
            "blocked" => JobStatus::Blocked,
            "canceled" => JobStatus::Canceled,
            "unauthorized" => JobStatus::Unauthorized,
            other => JobStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        JobStatus::from(value.as_str())
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
