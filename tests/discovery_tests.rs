use std::{fs, path::PathBuf};

use hackrev::{
    review::batch::{CHUNK_DIR, OUTPUT_DIR, discover_submissions},
    rubric::ArtifactKind,
};
use uuid::Uuid;

fn temp_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!("hackrev-disc-{}", Uuid::new_v4()));
    fs::create_dir_all(&root).expect("create temp root");
    root
}

#[test]
fn code_discovery_lists_chunk_files_in_order() {
    let root = temp_root();
    let chunks = root.join("1").join(CHUNK_DIR);
    fs::create_dir_all(&chunks).expect("create chunk dir");
    fs::write(chunks.join("chunk_b.txt"), "fn b() {}").expect("write chunk");
    fs::write(chunks.join("chunk_a.txt"), "fn a() {}").expect("write chunk");

    let submissions =
        discover_submissions(&root, ArtifactKind::CodeChunk).expect("discovery should succeed");
    assert_eq!(submissions.len(), 1);

    let submission = &submissions[0];
    assert_eq!(submission.name, "1");
    assert_eq!(submission.output_dir(), root.join("1").join(OUTPUT_DIR));

    let names: Vec<_> = submission
        .artifacts
        .iter()
        .map(|a| a.path.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["chunk_a.txt", "chunk_b.txt"]);
    assert!(submission
        .artifacts
        .iter()
        .all(|a| a.kind == ArtifactKind::CodeChunk));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn non_directory_entries_under_the_root_are_skipped() {
    let root = temp_root();
    fs::create_dir_all(root.join("1").join(CHUNK_DIR)).expect("create team");
    fs::write(root.join("notes.txt"), "not a submission").expect("write stray file");

    let submissions =
        discover_submissions(&root, ArtifactKind::CodeChunk).expect("discovery should succeed");
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].name, "1");

    let _ = fs::remove_dir_all(root);
}

#[test]
fn missing_chunk_folder_yields_zero_artifacts_without_error() {
    let root = temp_root();
    fs::create_dir_all(root.join("7")).expect("create team without chunk_data");

    let submissions =
        discover_submissions(&root, ArtifactKind::CodeChunk).expect("discovery should succeed");
    assert_eq!(submissions.len(), 1);
    assert!(submissions[0].artifacts.is_empty());

    let _ = fs::remove_dir_all(root);
}

#[test]
fn presentation_discovery_filters_on_extension() {
    let root = temp_root();
    let team = root.join("3");
    fs::create_dir_all(team.join(OUTPUT_DIR)).expect("create team with old output");
    fs::write(team.join("deck.pptx"), "fake").expect("write deck");
    fs::write(team.join("pitch.PDF"), "fake").expect("write pdf");
    fs::write(team.join("README.md"), "hello").expect("write readme");

    let submissions = discover_submissions(&root, ArtifactKind::Presentation)
        .expect("discovery should succeed");
    assert_eq!(submissions.len(), 1);

    let names: Vec<_> = submissions[0]
        .artifacts
        .iter()
        .map(|a| a.path.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["deck.pptx", "pitch.PDF"]);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn submissions_are_ordered_by_name() {
    let root = temp_root();
    for team in ["2", "10", "1"] {
        fs::create_dir_all(root.join(team).join(CHUNK_DIR)).expect("create team");
    }

    let submissions =
        discover_submissions(&root, ArtifactKind::CodeChunk).expect("discovery should succeed");
    let names: Vec<_> = submissions.iter().map(|s| s.name.clone()).collect();
    assert_eq!(names, ["1", "10", "2"]);

    let _ = fs::remove_dir_all(root);
}
