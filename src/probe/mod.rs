//! Batch probing of files for photo metadata.
//!
//! - [`ProbeService`]: reads prefixes and runs the parser with bounded parallelism
//! - [`ProbeReport`] / [`ProbeOutcome`]: per-file result
//! - [`ProbeSummary`]: outcome counts for a batch

mod report;
mod service;

pub use report::{ProbeOutcome, ProbeReport, ProbeSummary};
pub use service::{ProbeService, DEFAULT_CONCURRENCY};
