//! Error types for waiting on workflows

use circle_client::ClientError;
use thiserror::Error;

/// Result type alias for waiter operations
pub type Result<T> = std::result::Result<T, WaiterError>;

/// Errors that end a wait or a failure report
///
/// `Canceled` means the outcome is unknown, as opposed to a pipeline that
/// finished with a failure (which is reported through the summary, not as an
/// error).
#[derive(Debug, Error)]
pub enum WaiterError {
    /// CircleCI request failed
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The deadline passed or the caller canceled
    #[error("canceled before all workflows finished")]
    Canceled,
}

impl WaiterError {
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}
