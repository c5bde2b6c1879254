//! Cancellation-aware suspension points
//!
//! Every network call and every backoff sleep goes through one of these so
//! an expired deadline interrupts it instead of waiting for it to finish.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::{Result, WaiterError};

/// Runs a client call unless `cancel` fires first
pub(crate) async fn guarded<T, F>(cancel: &CancellationToken, call: F) -> Result<T>
where
    F: Future<Output = circle_client::Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(WaiterError::Canceled),
        result = call => result.map_err(WaiterError::from),
    }
}

/// Sleeps for `duration` unless `cancel` fires first
pub(crate) async fn sleep(cancel: &CancellationToken, duration: Duration) -> Result<()> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(WaiterError::Canceled),
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}
