#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! End-to-end processing of a single artifact: extract, score, persist.
//!
//! Any failure here concerns exactly one artifact. The batch driver catches
//! the error, logs it with the artifact path, and moves on; no output file
//! or mapping entry is written for a failed artifact.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::warn;

use super::client::ScoringClient;
use crate::extract::{self, Artifact};

/// The persisted result of processing one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedArtifact {
    /// Path of the reviewed artifact.
    pub source: PathBuf,
    /// Path of the JSON score record written for it.
    pub output: PathBuf,
}

/// Processes one artifact: extracts its text, scores it, and writes the
/// validated score record to `output_dir`.
///
/// The output filename is the artifact's base filename with the
/// kind-specific record suffix, so re-processing an artifact overwrites its
/// previous record.
pub async fn process_artifact(
    client: &ScoringClient,
    artifact: &Artifact,
    output_dir: &Path,
) -> Result<ProcessedArtifact> {
    let text = extract::extract(artifact)?;
    if text.trim().is_empty() {
        // Submitted anyway; the rubric scores absent content accordingly.
        warn!(
            artifact = %artifact.path.display(),
            "artifact produced no reviewable text"
        );
    }

    let record = client.score(&text).await?;

    let stem = artifact
        .path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("Artifact `{}` has no usable filename", artifact.path.display()))?;
    let output = output_dir.join(format!("{stem}{}", artifact.kind.record_suffix()));

    let json = serde_json::to_string_pretty(&record)?;
    std::fs::write(&output, json)
        .with_context(|| format!("Could not write score record to `{}`", output.display()))?;

    Ok(ProcessedArtifact {
        source: artifact.path.clone(),
        output,
    })
}
