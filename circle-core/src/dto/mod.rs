//! Data Transfer Objects for the CircleCI REST API
//!
//! Response envelopes that wrap domain types on the wire. The client unwraps
//! these before handing data to callers.

pub mod error;
pub mod page;
