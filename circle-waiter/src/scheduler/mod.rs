//! Polling layer
//!
//! Repeats status aggregation until the selected workflows finish, backing
//! off between polls. The loop has no iteration bound; it ends on a terminal
//! summary, an early failure, a client error or cancellation.

pub mod poller;
pub mod wait;

pub use poller::{WaitOutcome, wait_for_jobs};
pub use wait::WaitDuration;
