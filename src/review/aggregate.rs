#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Per-submission score aggregation.
//!
//! Scans a submission's output directory for persisted score records, sums
//! each category's score across records, and writes the rounded per-category
//! mean as `scores_summary.json`. Re-running on an unchanged directory
//! produces a byte-identical summary.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Filename of the per-submission summary document.
pub const SUMMARY_FILE: &str = "scores_summary.json";

/// Per-submission aggregate: rounded mean score per rubric category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Rounded mean score keyed by category name.
    pub scores_by_category: BTreeMap<String, i64>,
}

/// Computes the score summary for one submission's output directory.
///
/// Every document whose name ends in `record_suffix` counts toward the
/// divisor, including documents contributing no scorable field; the summary
/// file itself is never an input. A directory with zero score documents
/// yields an empty summary rather than a division by zero.
pub fn aggregate(output_dir: &Path, record_suffix: &str) -> Result<ScoreSummary> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(output_dir)
        .with_context(|| format!("Could not read output directory `{}`", output_dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name != SUMMARY_FILE && name.ends_with(record_suffix))
        })
        .collect();
    // Deterministic read order keeps the summary byte-stable across runs.
    paths.sort();

    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    let mut documents = 0usize;

    for path in paths {
        documents += 1;

        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(record = %path.display(), error = %err, "could not read score record");
                continue;
            }
        };
        let data: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(err) => {
                warn!(record = %path.display(), error = %err, "score record is not valid JSON");
                continue;
            }
        };

        let Some(map) = data.as_object() else {
            continue;
        };
        for (category, value) in map {
            if let Some(score) = value.get("score").and_then(serde_json::Value::as_f64) {
                *totals.entry(category.clone()).or_insert(0.0) += score;
            }
        }
    }

    if documents == 0 {
        return Ok(ScoreSummary::default());
    }

    let scores_by_category = totals
        .into_iter()
        .map(|(category, total)| (category, (total / documents as f64).round() as i64))
        .collect();

    Ok(ScoreSummary { scores_by_category })
}

/// Computes and persists the score summary, overwriting any prior summary
/// for the same submission.
pub fn write_summary(output_dir: &Path, record_suffix: &str) -> Result<PathBuf> {
    let summary = aggregate(output_dir, record_suffix)?;

    let path = output_dir.join(SUMMARY_FILE);
    let json = serde_json::to_string_pretty(&summary)?;
    std::fs::write(&path, json)
        .with_context(|| format!("Could not write score summary to `{}`", path.display()))?;

    info!(summary = %path.display(), "scores summary saved");
    Ok(path)
}
