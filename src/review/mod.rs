#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Per-submission score aggregation.
pub mod aggregate;
/// Submission discovery and the batch driver.
pub mod batch;
/// The scoring client issuing one rubric evaluation per artifact.
pub mod client;
/// End-to-end processing of a single artifact.
pub mod processor;

pub use aggregate::{ScoreSummary, write_summary};
pub use batch::{Submission, discover_submissions, run_review};
pub use client::ScoringClient;
