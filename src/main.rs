#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # hackrev
//!
//! Command-line entry point for the hackathon review pipeline.
//!
//! `hackrev fetch ROSTER ROOT` pulls every team's repository and pitch deck,
//! `hackrev code ROOT` scores pre-chunked source files, and `hackrev pitch
//! ROOT` scores presentations. Scoring requires `REVIEW_API_KEY` (and
//! optionally `REVIEW_API_BASE`, `REVIEW_MODEL`, `REVIEW_TEMPERATURE`,
//! `REVIEW_REQUEST_DELAY_MS`) in the environment or a `.env` file.

use std::path::PathBuf;

use anyhow::Result;
use bpaf::*;
use dotenvy::dotenv;
use hackrev::{ingest, review, rubric::ArtifactKind};
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Score every submission's code chunks under a root folder.
    Code(PathBuf),
    /// Score every submission's pitch deck under a root folder.
    Pitch(PathBuf),
    /// Fetch repositories and pitch decks listed in a roster CSV.
    Fetch {
        /// Roster CSV of team name, presentation URL, repository URL.
        roster: PathBuf,
        /// Destination root for numbered team directories.
        root:   PathBuf,
    },
}

/// Parses the command line arguments and returns a `Cmd` enum.
fn options() -> Cmd {
    /// Parses the submissions root folder.
    fn root() -> impl Parser<PathBuf> {
        positional("ROOT").help("Folder containing one subdirectory per submission")
    }

    let code = construct!(Cmd::Code(root()))
        .to_options()
        .command("code")
        .help("Review code chunks for every submission");

    let pitch = construct!(Cmd::Pitch(root()))
        .to_options()
        .command("pitch")
        .help("Review pitch decks for every submission");

    let roster = positional::<PathBuf>("ROSTER")
        .help("Roster CSV (team name, presentation URL, repo URL)");
    let fetch = construct!(Cmd::Fetch { roster, root() })
        .to_options()
        .command("fetch")
        .help("Clone repositories and download pitch decks from a roster");

    construct!([code, pitch, fetch])
        .to_options()
        .descr("Hackathon submission reviewer")
        .run()
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(Level::INFO);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    match options() {
        Cmd::Code(root) => review::run_review(&root, ArtifactKind::CodeChunk).await?,
        Cmd::Pitch(root) => review::run_review(&root, ArtifactKind::Presentation).await?,
        Cmd::Fetch { roster, root } => {
            let output_csv = root.join("team_numbers.csv");
            ingest::process_roster(&roster, &root, &output_csv).await?;
        }
    }

    Ok(())
}
