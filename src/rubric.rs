#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Rubric schemas and score-record validation.
//!
//! Each artifact kind has a fixed set of scored categories, every category
//! with a declared inclusive bound. Responses from the scoring model are
//! parsed and validated against that schema before anything is persisted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The kind of reviewable unit a submission contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// A contiguous slice of source text produced by the chunking step.
    CodeChunk,
    /// A pitch deck (PPTX or PDF).
    Presentation,
}

impl ArtifactKind {
    /// Returns the fixed category schema for this kind.
    pub fn categories(self) -> &'static [CategoryBound] {
        match self {
            ArtifactKind::CodeChunk => CODE_RUBRIC,
            ArtifactKind::Presentation => PRESENTATION_RUBRIC,
        }
    }

    /// Suffix appended to an artifact's base filename when its score record
    /// is persisted.
    pub fn record_suffix(self) -> &'static str {
        match self {
            ArtifactKind::CodeChunk => ".json",
            ArtifactKind::Presentation => "_evaluation.json",
        }
    }
}

/// One rubric category and its declared inclusive score bound.
#[derive(Debug, Clone, Copy)]
pub struct CategoryBound {
    /// Category name as it appears in score records.
    pub name: &'static str,
    /// Lowest acceptable score.
    pub min:  f64,
    /// Highest acceptable score.
    pub max:  f64,
}

/// Shorthand for declaring a category bound.
const fn bound(name: &'static str, min: f64, max: f64) -> CategoryBound {
    CategoryBound { name, min, max }
}

/// Categories scored for every code chunk. All are 1 (poor) to 10
/// (excellent).
pub const CODE_RUBRIC: &[CategoryBound] = &[
    bound("readability", 1.0, 10.0),
    bound("maintainability", 1.0, 10.0),
    bound("consistency", 1.0, 10.0),
    bound("commenting", 1.0, 10.0),
    bound("correctness", 1.0, 10.0),
    bound("completeness", 1.0, 10.0),
    bound("error_handling", 1.0, 10.0),
    bound("efficiency", 1.0, 10.0),
    bound("scalability", 1.0, 10.0),
    bound("security", 1.0, 10.0),
    bound("test_coverage", 1.0, 10.0),
    bound("innovation", 1.0, 10.0),
    bound("creativity", 1.0, 10.0),
    bound("complexity_score", 1.0, 10.0),
    bound("technical_complexity", 1.0, 10.0),
];

/// Categories scored for every pitch deck. Upper bounds vary by category and
/// match the weights announced to participants.
pub const PRESENTATION_RUBRIC: &[CategoryBound] = &[
    bound("intel_technology", 0.0, 10.0),
    bound("theme_relevance", 0.0, 15.0),
    bound("innovation_creativity", 0.0, 15.0),
    bound("technical_feasibility", 0.0, 20.0),
    bound("sustainability_impact", 0.0, 15.0),
    bound("presentation_clarity", 0.0, 10.0),
    bound("scalability_viability", 0.0, 5.0),
];

/// A single scored criterion as returned by the model.
///
/// Extra fields (justifications, comments) are tolerated on the wire but not
/// retained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    /// Numeric score within the category's declared bound.
    pub score: f64,
}

/// The full structured score result for one artifact: category name to
/// criterion score. Persisted verbatim as a JSON document once validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Per-category scores, keyed by rubric category name.
    #[serde(flatten)]
    pub scores: BTreeMap<String, CriterionScore>,
}

/// A scoring response that does not conform to the declared rubric schema.
#[derive(thiserror::Error, Debug)]
pub enum RubricError {
    /// The response payload was not the expected JSON shape.
    #[error("scoring response is not a valid score record: {0}")]
    Malformed(#[from] serde_json::Error),
    /// A required rubric category was absent from the response.
    #[error("scoring response is missing rubric category `{name}`")]
    MissingCategory {
        /// Name of the absent category.
        name: &'static str,
    },
    /// The response contained a category the rubric does not declare.
    #[error("scoring response contains unknown category `{name}`")]
    UnknownCategory {
        /// Name of the undeclared category.
        name: String,
    },
    /// A score fell outside its category's declared bound.
    #[error("score {score} for `{name}` is outside the declared bound {min}..={max}")]
    OutOfBounds {
        /// Category whose score violated the bound.
        name:  String,
        /// Offending score.
        score: f64,
        /// Lowest acceptable score.
        min:   f64,
        /// Highest acceptable score.
        max:   f64,
    },
}

impl ScoreRecord {
    /// Parses a model response payload into a validated score record.
    ///
    /// Models occasionally wrap JSON output in a Markdown code fence even
    /// when asked not to, so fences are stripped before parsing.
    pub fn parse(kind: ArtifactKind, payload: &str) -> Result<Self, RubricError> {
        let record: ScoreRecord = serde_json::from_str(strip_code_fence(payload))?;
        record.validate(kind)?;
        Ok(record)
    }

    /// Checks this record against the fixed category schema for `kind`.
    pub fn validate(&self, kind: ArtifactKind) -> Result<(), RubricError> {
        let rubric = kind.categories();

        for category in rubric {
            if !self.scores.contains_key(category.name) {
                return Err(RubricError::MissingCategory {
                    name: category.name,
                });
            }
        }

        for (name, criterion) in &self.scores {
            let Some(category) = rubric.iter().find(|c| c.name == name) else {
                return Err(RubricError::UnknownCategory { name: name.clone() });
            };
            if criterion.score < category.min || criterion.score > category.max {
                return Err(RubricError::OutOfBounds {
                    name:  name.clone(),
                    score: criterion.score,
                    min:   category.min,
                    max:   category.max,
                });
            }
        }

        Ok(())
    }
}

/// Removes a surrounding Markdown code fence, if present.
fn strip_code_fence(payload: &str) -> &str {
    let trimmed = payload.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_code_fence_handles_plain_and_fenced_payloads() {
        assert_eq!(strip_code_fence("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }
}
