use hackrev::rubric::{ArtifactKind, RubricError, ScoreRecord};
use serde_json::{Map, Value, json};

fn full_payload(kind: ArtifactKind, score_for: impl Fn(&str) -> f64) -> String {
    let mut map = Map::new();
    for category in kind.categories() {
        map.insert(
            category.name.to_string(),
            json!({ "score": score_for(category.name) }),
        );
    }
    Value::Object(map).to_string()
}

#[test]
fn complete_code_record_is_accepted() {
    let payload = full_payload(ArtifactKind::CodeChunk, |_| 7.0);
    let record = ScoreRecord::parse(ArtifactKind::CodeChunk, &payload)
        .expect("a complete in-bounds record should validate");
    assert_eq!(record.scores.len(), ArtifactKind::CodeChunk.categories().len());
    assert_eq!(record.scores["readability"].score, 7.0);
}

#[test]
fn fenced_payload_is_accepted() {
    let payload = format!("```json\n{}\n```", full_payload(ArtifactKind::CodeChunk, |_| 5.0));
    ScoreRecord::parse(ArtifactKind::CodeChunk, &payload)
        .expect("fenced JSON should still parse");
}

#[test]
fn missing_category_is_rejected() {
    let mut value: Value =
        serde_json::from_str(&full_payload(ArtifactKind::CodeChunk, |_| 5.0)).unwrap();
    value.as_object_mut().unwrap().remove("security");

    let err = ScoreRecord::parse(ArtifactKind::CodeChunk, &value.to_string()).unwrap_err();
    assert!(matches!(err, RubricError::MissingCategory { name: "security" }));
}

#[test]
fn unknown_category_is_rejected() {
    let mut value: Value =
        serde_json::from_str(&full_payload(ArtifactKind::CodeChunk, |_| 5.0)).unwrap();
    value
        .as_object_mut()
        .unwrap()
        .insert("vibes".into(), json!({ "score": 10 }));

    let err = ScoreRecord::parse(ArtifactKind::CodeChunk, &value.to_string()).unwrap_err();
    match err {
        RubricError::UnknownCategory { name } => assert_eq!(name, "vibes"),
        other => panic!("expected UnknownCategory, got {other}"),
    }
}

#[test]
fn out_of_bounds_score_is_rejected() {
    let payload = full_payload(ArtifactKind::Presentation, |name| {
        if name == "technical_feasibility" { 25.0 } else { 3.0 }
    });

    let err = ScoreRecord::parse(ArtifactKind::Presentation, &payload).unwrap_err();
    match err {
        RubricError::OutOfBounds { name, score, max, .. } => {
            assert_eq!(name, "technical_feasibility");
            assert_eq!(score, 25.0);
            assert_eq!(max, 20.0);
        }
        other => panic!("expected OutOfBounds, got {other}"),
    }
}

#[test]
fn presentation_bounds_are_per_category() {
    // 12 is over the code bound of 10 but within theme_relevance's 0..=15.
    let payload = full_payload(ArtifactKind::Presentation, |name| {
        if name == "theme_relevance" { 12.0 } else { 4.0 }
    });
    ScoreRecord::parse(ArtifactKind::Presentation, &payload)
        .expect("per-category upper bounds should apply");
}

#[test]
fn non_object_payload_is_malformed() {
    let err = ScoreRecord::parse(ArtifactKind::CodeChunk, "[1, 2, 3]").unwrap_err();
    assert!(matches!(err, RubricError::Malformed(_)));
}

#[test]
fn record_suffix_is_kind_specific() {
    assert_eq!(ArtifactKind::CodeChunk.record_suffix(), ".json");
    assert_eq!(ArtifactKind::Presentation.record_suffix(), "_evaluation.json");
}
