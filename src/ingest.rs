#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Roster ingestion: fetching the materials every submission is reviewed
//! from.
//!
//! Reads the event roster (a CSV of team name, presentation URL, repository
//! URL), validates each row, clones the repository into a numbered team
//! directory with the `git` binary, and downloads the pitch deck next to it.
//! Row failures are logged and skipped; one bad entry never aborts the
//! roster run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use reqwest::Url;
use tracing::{info, warn};
use which::which;

use crate::config;

/// Largest presentation download accepted, in bytes.
pub const PRESENTATION_SIZE_LIMIT: u64 = 10 * 1024 * 1024;

/// File extensions accepted for presentation downloads.
const PRESENTATION_EXTENSIONS: &[&str] = &[".ppt", ".pptx", ".pdf"];

/// One row of the event roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// Team name as registered.
    pub team_name:        String,
    /// URL of the team's pitch deck.
    pub presentation_url: String,
    /// URL of the team's repository (possibly a GitHub browse URL).
    pub repository_url:   String,
}

/// A roster row that cannot be fetched.
#[derive(thiserror::Error, Debug)]
pub enum RosterError {
    /// The team name is malformed.
    #[error("team name `{0}` must be 3-50 characters of letters, digits, spaces, `-`, or `_`")]
    InvalidTeamName(String),
    /// The repository URL is not a GitHub repository.
    #[error("repository URL `{0}` is not a github.com repository")]
    NotGithub(String),
    /// The presentation URL does not name a supported file type.
    #[error("presentation URL `{0}` does not end in .ppt, .pptx, or .pdf")]
    UnsupportedPresentation(String),
    /// The presentation exceeds the download size cap.
    #[error("presentation `{url}` is {size} bytes, over the {limit} byte limit")]
    PresentationTooLarge {
        /// URL of the oversized presentation.
        url:   String,
        /// Reported or downloaded size.
        size:  u64,
        /// The configured cap.
        limit: u64,
    },
}

/// Reads the roster CSV. Rows are `team_name, presentation_url,
/// repository_url` with no header.
pub fn read_roster(path: &Path) -> Result<Vec<RosterEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Could not open roster `{}`", path.display()))?;

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record.context("Could not parse roster row")?;
        if record.len() < 3 {
            bail!("Roster row has {} fields, expected 3: {record:?}", record.len());
        }
        entries.push(RosterEntry {
            team_name:        record[0].to_string(),
            presentation_url: record[1].to_string(),
            repository_url:   record[2].to_string(),
        });
    }

    Ok(entries)
}

/// Validates one roster row against the registration rules.
pub fn validate_entry(entry: &RosterEntry) -> Result<(), RosterError> {
    let name = entry.team_name.as_str();
    let name_ok = (3..=50).contains(&name.chars().count())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-' || c == '_');
    if !name_ok {
        return Err(RosterError::InvalidTeamName(entry.team_name.clone()));
    }

    let github_ok = Url::parse(&entry.repository_url)
        .ok()
        .is_some_and(|url| {
            matches!(url.scheme(), "http" | "https") && url.host_str() == Some("github.com")
        });
    if !github_ok {
        return Err(RosterError::NotGithub(entry.repository_url.clone()));
    }

    let presentation = entry.presentation_url.to_ascii_lowercase();
    if !PRESENTATION_EXTENSIONS
        .iter()
        .any(|ext| presentation.ends_with(ext))
    {
        return Err(RosterError::UnsupportedPresentation(
            entry.presentation_url.clone(),
        ));
    }

    Ok(())
}

/// Reduces a GitHub browse URL (`.../tree/...` or `.../blob/...`) to the
/// clonable repository URL. Other URLs pass through unchanged.
pub fn normalize_clone_url(url: &str) -> &str {
    for marker in ["/tree/", "/blob/"] {
        if let Some(index) = url.find(marker) {
            return &url[..index];
        }
    }
    url
}

/// Clones `url` into `dest/repo` using the `git` binary.
///
/// An existing clone is left alone; a directory that exists but is not a
/// git checkout is an error rather than something to silently overwrite.
pub async fn clone_repository(url: &str, dest: &Path) -> Result<PathBuf> {
    let repo_dir = dest.join("repo");
    if repo_dir.join(".git").is_dir() {
        info!(repo = %repo_dir.display(), "repository already cloned");
        return Ok(repo_dir);
    }
    if repo_dir.exists() {
        bail!("`{}` exists but is not a git repository", repo_dir.display());
    }

    let git = which("git").context("Cannot find git on path")?;
    let output = tokio::process::Command::new(git)
        .arg("clone")
        .arg(url)
        .arg(&repo_dir)
        .output()
        .await
        .context("Could not launch git clone")?;

    if !output.status.success() {
        bail!(
            "git clone of `{url}` failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(repo_dir)
}

/// Downloads a presentation into `dest`, named after the last URL segment.
pub async fn download_presentation(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
) -> Result<PathBuf> {
    let file_name = url
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| anyhow!("Presentation URL `{url}` has no filename"))?;

    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Could not download presentation from `{url}`"))?
        .error_for_status()
        .with_context(|| format!("Presentation download from `{url}` was rejected"))?;

    // Reject on the advertised length up front, then enforce the cap while
    // streaming so an unadvertised oversized body is never fully buffered.
    if let Some(length) = response.content_length() {
        check_presentation_size(url, length)?;
    }

    let mut bytes: Vec<u8> = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .with_context(|| format!("Could not read presentation body from `{url}`"))?
    {
        check_presentation_size(url, (bytes.len() + chunk.len()) as u64)?;
        bytes.extend_from_slice(&chunk);
    }

    let path = dest.join(file_name);
    std::fs::write(&path, &bytes)
        .with_context(|| format!("Could not save presentation to `{}`", path.display()))?;
    info!(presentation = %path.display(), "presentation saved");

    Ok(path)
}

/// Rejects a presentation whose size is over the download cap.
fn check_presentation_size(url: &str, size: u64) -> Result<(), RosterError> {
    if size > PRESENTATION_SIZE_LIMIT {
        return Err(RosterError::PresentationTooLarge {
            url: url.to_string(),
            size,
            limit: PRESENTATION_SIZE_LIMIT,
        });
    }
    Ok(())
}

/// Fetches every roster entry into numbered team directories under `root`
/// and appends `team_name, assigned_number` rows to `output_csv`.
///
/// Teams are numbered by roster order starting at 1; the number doubles as
/// the anonymized directory name the review flows operate on.
pub async fn process_roster(roster: &Path, root: &Path, output_csv: &Path) -> Result<()> {
    let entries = read_roster(roster)?;
    let http = config::http_client();

    let out_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(output_csv)
        .with_context(|| format!("Could not open `{}`", output_csv.display()))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out_file);

    for (index, entry) in entries.iter().enumerate() {
        let number = (index + 1).to_string();

        if let Err(err) = validate_entry(entry) {
            warn!(team = %entry.team_name, error = %err, "skipping roster entry");
            continue;
        }

        let team_dir = root.join(&number);
        if let Err(err) = fetch_entry(&http, entry, &team_dir).await {
            warn!(
                team = %entry.team_name,
                error = %format!("{err:#}"),
                "could not fetch submission materials"
            );
            continue;
        }

        writer
            .write_record([entry.team_name.as_str(), number.as_str()])
            .context("Could not append to the team-number CSV")?;
    }

    writer.flush().context("Could not flush the team-number CSV")?;
    Ok(())
}

/// Fetches one validated roster entry: repository clone plus presentation
/// download.
async fn fetch_entry(
    http: &reqwest::Client,
    entry: &RosterEntry,
    team_dir: &Path,
) -> Result<()> {
    std::fs::create_dir_all(team_dir)
        .with_context(|| format!("Could not create `{}`", team_dir.display()))?;

    let clone_url = normalize_clone_url(&entry.repository_url);
    clone_repository(clone_url, team_dir).await?;
    download_presentation(http, &entry.presentation_url, team_dir).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presentation_size_cap_is_inclusive() {
        check_presentation_size("https://x.test/a.pdf", PRESENTATION_SIZE_LIMIT)
            .expect("a body exactly at the cap is accepted");

        let err = check_presentation_size("https://x.test/a.pdf", PRESENTATION_SIZE_LIMIT + 1)
            .unwrap_err();
        assert!(matches!(err, RosterError::PresentationTooLarge { .. }));
    }
}
