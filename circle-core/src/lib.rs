//! CircleCI Helper Core
//!
//! Core types shared by the CircleCI helper crates.
//!
//! This crate contains:
//! - Domain types: workflow, job and job detail snapshots as reported by CircleCI,
//!   together with their status classification
//! - DTOs: response envelopes used by the CircleCI REST API

pub mod domain;
pub mod dto;
