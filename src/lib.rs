//! # hackrev
//!
//! A batch review pipeline for hackathon submissions. Clones contestant
//! repositories and downloads pitch decks from an event roster, scores
//! pre-chunked source files and extracted presentation text against a fixed
//! rubric using an LLM, and aggregates per-category scores into
//! per-submission summaries.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Environment-driven configuration shared across the crate.
pub mod config;
/// Content extraction for review artifacts.
pub mod extract;
/// Roster ingestion: fetching repositories and pitch decks.
pub mod ingest;
/// Scoring, per-artifact processing, aggregation, and the batch driver.
pub mod review;
/// Rubric schemas and score-record validation.
pub mod rubric;
