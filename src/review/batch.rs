#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Submission discovery and the batch driver.
//!
//! Discovery builds an immutable list of submission descriptors up front, so
//! the pipeline can be exercised against an injected list without touching
//! the scoring service. The driver then processes submissions strictly
//! sequentially: every artifact is scored one at a time with a fixed pause
//! between requests, each submission is aggregated once, and a single global
//! artifact-to-output mapping is written at the end of the run.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use itertools::Itertools;
use tracing::{info, warn};

use super::{aggregate, client::ScoringClient, processor};
use crate::{
    config,
    extract::Artifact,
    rubric::ArtifactKind,
};

/// Per-submission folder holding pre-chunked source files in the code flow.
pub const CHUNK_DIR: &str = "chunk_data";

/// Per-submission folder receiving score records and the summary.
pub const OUTPUT_DIR: &str = "output_data";

/// File extensions accepted as pitch decks.
const PRESENTATION_EXTENSIONS: &[&str] = &["ppt", "pptx", "pdf"];

/// One hackathon entry: a team directory and its reviewable artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Team name or number, taken from the directory name.
    pub name:      String,
    /// The submission's directory under the root folder.
    pub dir:       PathBuf,
    /// Artifacts to review, in processing order.
    pub artifacts: Vec<Artifact>,
}

impl Submission {
    /// Returns the directory score records and the summary are written to.
    pub fn output_dir(&self) -> PathBuf {
        self.dir.join(OUTPUT_DIR)
    }
}

/// Enumerates the submissions under `root` for the given review flow.
///
/// Every directory directly under the root is one submission; non-directory
/// entries are skipped silently. The returned list is ordered by submission
/// name so runs are deterministic.
pub fn discover_submissions(root: &Path, kind: ArtifactKind) -> Result<Vec<Submission>> {
    let mut submissions = Vec::new();

    for entry in std::fs::read_dir(root)
        .with_context(|| format!("Could not read submissions root `{}`", root.display()))?
    {
        let entry = entry?;
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let artifacts = match kind {
            ArtifactKind::CodeChunk => code_artifacts(&dir)?,
            ArtifactKind::Presentation => presentation_artifacts(&dir)?,
        };

        submissions.push(Submission {
            name,
            dir,
            artifacts,
        });
    }

    submissions.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(submissions)
}

/// Collects a submission's pre-chunked source files.
///
/// A missing `chunk_data` folder leaves the submission with zero artifacts
/// instead of aborting the run; the aggregator will record an empty summary
/// for it.
fn code_artifacts(dir: &Path) -> Result<Vec<Artifact>> {
    let chunk_dir = dir.join(CHUNK_DIR);
    if !chunk_dir.is_dir() {
        warn!(submission = %dir.display(), "no chunk_data folder; nothing to review");
        return Ok(Vec::new());
    }

    let artifacts = std::fs::read_dir(&chunk_dir)
        .with_context(|| format!("Could not read chunk folder `{}`", chunk_dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .sorted()
        .map(|path| Artifact::new(path, ArtifactKind::CodeChunk))
        .collect();

    Ok(artifacts)
}

/// Collects a submission's pitch decks: files directly under the submission
/// directory whose extension matches a presentation type.
fn presentation_artifacts(dir: &Path) -> Result<Vec<Artifact>> {
    let artifacts = std::fs::read_dir(dir)
        .with_context(|| format!("Could not read submission folder `{}`", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| {
                        PRESENTATION_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
                    })
        })
        .sorted()
        .map(|path| Artifact::new(path, ArtifactKind::Presentation))
        .collect();

    Ok(artifacts)
}

/// Filename of the global artifact-to-output mapping for a review flow.
fn mapping_file(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::CodeChunk => "file_output_mapping.json",
        ArtifactKind::Presentation => "presentation_output_mapping.json",
    }
}

/// Runs the full review over every submission under `root`.
///
/// A failed artifact is logged and skipped without aborting its siblings or
/// the submission; a failed aggregation is logged and the run continues with
/// the next submission. The accumulated mapping is flushed once at the end
/// of the run.
pub async fn run_review(root: &Path, kind: ArtifactKind) -> Result<()> {
    let cfg = config::ensure_initialized()?;
    let client = ScoringClient::from_config(&cfg, kind)?;
    let submissions = discover_submissions(root, kind)?;
    let delay = cfg.request_delay();

    let mut mapping: BTreeMap<String, String> = BTreeMap::new();

    for submission in &submissions {
        info!(team = %submission.name, "processing submission");

        let output_dir = submission.output_dir();
        std::fs::create_dir_all(&output_dir).with_context(|| {
            format!("Could not create output directory `{}`", output_dir.display())
        })?;

        for artifact in &submission.artifacts {
            info!(artifact = %artifact.path.display(), "processing artifact");
            match processor::process_artifact(&client, artifact, &output_dir).await {
                Ok(done) => {
                    mapping.insert(
                        done.source.display().to_string(),
                        done.output.display().to_string(),
                    );
                }
                Err(err) => {
                    warn!(
                        artifact = %artifact.path.display(),
                        error = %format!("{err:#}"),
                        "skipping artifact"
                    );
                }
            }
            tokio::time::sleep(delay).await;
        }

        if let Err(err) = aggregate::write_summary(&output_dir, kind.record_suffix()) {
            warn!(
                team = %submission.name,
                error = %format!("{err:#}"),
                "could not aggregate scores"
            );
        }
    }

    let mapping_path = root.join(mapping_file(kind));
    let json = serde_json::to_string_pretty(&mapping)?;
    std::fs::write(&mapping_path, json)
        .with_context(|| format!("Could not write mapping to `{}`", mapping_path.display()))?;
    info!(mapping = %mapping_path.display(), "artifact mapping saved");

    Ok(())
}
