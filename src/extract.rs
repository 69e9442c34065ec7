#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Content extraction for review artifacts.
//!
//! Turns a raw artifact (a source-code chunk or a pitch deck) into plain
//! text suitable for submission to the scoring model. Both artifact kinds
//! report failure through the same error type; the processing layer decides
//! what a failure means for the surrounding run.

use std::{io::Read, path::PathBuf};

use quick_xml::{Reader, events::Event};

use crate::rubric::ArtifactKind;

/// One unit of review input, immutable once discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Path of the file to review.
    pub path: PathBuf,
    /// Whether the file is a code chunk or a presentation.
    pub kind: ArtifactKind,
}

/// An error while turning an artifact into reviewable text.
#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    /// The artifact file could not be read from disk.
    #[error("could not read `{path}`")]
    Unreadable {
        /// Path of the unreadable artifact.
        path:   PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The artifact file is not valid UTF-8 text.
    #[error("`{path}` is not valid UTF-8 text")]
    NotText {
        /// Path of the offending artifact.
        path: PathBuf,
    },
    /// The presentation container could not be opened or parsed.
    #[error("could not open presentation `{path}`: {reason}")]
    BadContainer {
        /// Path of the corrupt or unsupported container.
        path:   PathBuf,
        /// Human-readable failure description from the parser.
        reason: String,
    },
    /// The presentation file extension is not one we can parse. Legacy
    /// `.ppt` decks fall here: they are OLE containers, not zip archives,
    /// and we have no parser for them.
    #[error("`{path}` is not a supported presentation format")]
    UnsupportedFormat {
        /// Path of the unsupported artifact.
        path: PathBuf,
    },
}

impl Artifact {
    /// Creates an artifact descriptor for `path`.
    pub fn new(path: impl Into<PathBuf>, kind: ArtifactKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Extracts the reviewable text for `artifact`.
///
/// Code chunks are passed through unmodified. Presentations yield slide- or
/// page-labeled sections joined by blank lines; a deck with no text-bearing
/// content yields an empty string, which is still a successful extraction.
pub fn extract(artifact: &Artifact) -> Result<String, ExtractError> {
    match artifact.kind {
        ArtifactKind::CodeChunk => extract_code(artifact),
        ArtifactKind::Presentation => extract_presentation(artifact),
    }
}

/// Reads a code chunk as UTF-8 text, unmodified.
fn extract_code(artifact: &Artifact) -> Result<String, ExtractError> {
    std::fs::read_to_string(&artifact.path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::InvalidData {
            ExtractError::NotText {
                path: artifact.path.clone(),
            }
        } else {
            ExtractError::Unreadable {
                path: artifact.path.clone(),
                source,
            }
        }
    })
}

/// Dispatches presentation extraction on the file extension.
///
/// Only PPTX and PDF can be parsed. Legacy `.ppt` decks are still
/// discovered and downloaded, but extraction reports them unsupported and
/// the artifact is skipped like any other extraction failure.
fn extract_presentation(artifact: &Artifact) -> Result<String, ExtractError> {
    let extension = artifact
        .path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("pptx") => extract_pptx(artifact),
        Some("pdf") => extract_pdf(artifact),
        _ => Err(ExtractError::UnsupportedFormat {
            path: artifact.path.clone(),
        }),
    }
}

/// Extracts slide text from a PPTX container.
///
/// A PPTX file is a zip archive; each slide lives at
/// `ppt/slides/slideN.xml` and its visible text is the set of `<a:t>` runs.
/// Runs are newline-joined per slide, and slides are labeled 1-based in
/// slide order.
fn extract_pptx(artifact: &Artifact) -> Result<String, ExtractError> {
    let bad_container = |reason: String| ExtractError::BadContainer {
        path:   artifact.path.clone(),
        reason,
    };

    let file = std::fs::File::open(&artifact.path).map_err(|source| ExtractError::Unreadable {
        path: artifact.path.clone(),
        source,
    })?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| bad_container(e.to_string()))?;

    let mut slides: Vec<(usize, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slides.sort_by_key(|(n, _)| *n);

    let mut sections = Vec::with_capacity(slides.len());
    for (number, name) in slides {
        let mut xml = String::new();
        archive
            .by_name(&name)
            .map_err(|e| bad_container(e.to_string()))?
            .read_to_string(&mut xml)
            .map_err(|e| bad_container(e.to_string()))?;

        let text = slide_text(&xml).map_err(|e| bad_container(e.to_string()))?;
        sections.push(format!("Slide {number}\n{text}"));
    }

    Ok(sections.join("\n\n"))
}

/// Parses the slide index out of an archive entry name, if the entry is a
/// slide part.
fn slide_number(entry_name: &str) -> Option<usize> {
    entry_name
        .strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Collects the text runs (`<a:t>` elements) of one slide's XML,
/// newline-joined.
fn slide_text(xml: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut runs: Vec<String> = Vec::new();
    let mut in_run = false;

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(e) if e.name().as_ref() == b"a:t" => in_run = true,
            Event::End(e) if e.name().as_ref() == b"a:t" => in_run = false,
            Event::Text(t) if in_run => runs.push(t.unescape()?.into_owned()),
            _ => {}
        }
    }

    Ok(runs.join("\n"))
}

/// Extracts page text from a PDF, labeled 1-based on form-feed page breaks.
fn extract_pdf(artifact: &Artifact) -> Result<String, ExtractError> {
    let text =
        pdf_extract::extract_text(&artifact.path).map_err(|e| ExtractError::BadContainer {
            path:   artifact.path.clone(),
            reason: e.to_string(),
        })?;

    let sections: Vec<String> = text
        .split('\u{000C}')
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .enumerate()
        .map(|(i, page)| format!("Page {}\n{page}", i + 1))
        .collect();

    Ok(sections.join("\n\n"))
}
