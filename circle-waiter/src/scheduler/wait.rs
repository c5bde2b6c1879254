//! Poll backoff

use std::time::Duration;

/// How long to sleep between polls
///
/// Pipelines with many pending jobs take longer to settle, so polling slows
/// down once `job_threshold` jobs are pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitDuration {
    pub default: Duration,
    pub multiple_jobs: Duration,
    pub job_threshold: usize,
}

impl WaitDuration {
    /// Doubles `default` once three or more jobs are pending
    pub fn new(default: Duration) -> Self {
        Self {
            default,
            multiple_jobs: default.saturating_mul(2),
            job_threshold: 3,
        }
    }

    pub fn for_pending_jobs(&self, pending_jobs: usize) -> Duration {
        if pending_jobs >= self.job_threshold {
            self.multiple_jobs
        } else {
            self.default
        }
    }
}
