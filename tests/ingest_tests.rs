use std::{fs, path::PathBuf};

use hackrev::ingest::{RosterEntry, RosterError, normalize_clone_url, read_roster, validate_entry};
use uuid::Uuid;

fn entry(team: &str, deck: &str, repo: &str) -> RosterEntry {
    RosterEntry {
        team_name:        team.to_string(),
        presentation_url: deck.to_string(),
        repository_url:   repo.to_string(),
    }
}

#[test]
fn browse_urls_are_reduced_to_clone_urls() {
    assert_eq!(
        normalize_clone_url("https://github.com/acme/widget/tree/main/src"),
        "https://github.com/acme/widget"
    );
    assert_eq!(
        normalize_clone_url("https://github.com/acme/widget/blob/main/README.md"),
        "https://github.com/acme/widget"
    );
    assert_eq!(
        normalize_clone_url("https://github.com/acme/widget"),
        "https://github.com/acme/widget"
    );
}

#[test]
fn well_formed_entry_validates() {
    let ok = entry(
        "Team Rocket",
        "https://cdn.example.com/decks/pitch.pptx",
        "https://github.com/acme/widget",
    );
    validate_entry(&ok).expect("well-formed entry should validate");
}

#[test]
fn team_name_length_and_charset_are_enforced() {
    let short = entry("ab", "https://x.test/a.pdf", "https://github.com/a/b");
    assert!(matches!(
        validate_entry(&short),
        Err(RosterError::InvalidTeamName(_))
    ));

    let emoji = entry("team 🚀", "https://x.test/a.pdf", "https://github.com/a/b");
    assert!(matches!(
        validate_entry(&emoji),
        Err(RosterError::InvalidTeamName(_))
    ));
}

#[test]
fn repository_must_be_on_github() {
    let gitlab = entry(
        "Team Rocket",
        "https://x.test/a.pdf",
        "https://gitlab.com/acme/widget",
    );
    assert!(matches!(
        validate_entry(&gitlab),
        Err(RosterError::NotGithub(_))
    ));

    let not_a_url = entry("Team Rocket", "https://x.test/a.pdf", "acme/widget");
    assert!(matches!(
        validate_entry(&not_a_url),
        Err(RosterError::NotGithub(_))
    ));
}

#[test]
fn presentation_must_be_a_known_file_type() {
    let webpage = entry(
        "Team Rocket",
        "https://docs.example.com/view?id=42",
        "https://github.com/acme/widget",
    );
    assert!(matches!(
        validate_entry(&webpage),
        Err(RosterError::UnsupportedPresentation(_))
    ));
}

#[test]
fn roster_rows_are_parsed_in_order() {
    let path: PathBuf =
        std::env::temp_dir().join(format!("hackrev-roster-{}.csv", Uuid::new_v4()));
    fs::write(
        &path,
        "Team Rocket, https://x.test/a.pptx, https://github.com/acme/widget\n\
         Team Plasma, https://x.test/b.pdf, https://github.com/acme/gadget\n",
    )
    .expect("write roster");

    let entries = read_roster(&path).expect("roster should parse");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].team_name, "Team Rocket");
    assert_eq!(entries[0].presentation_url, "https://x.test/a.pptx");
    assert_eq!(entries[1].repository_url, "https://github.com/acme/gadget");

    let _ = fs::remove_file(path);
}

#[test]
fn short_roster_row_is_an_error() {
    let path: PathBuf =
        std::env::temp_dir().join(format!("hackrev-roster-{}.csv", Uuid::new_v4()));
    fs::write(&path, "Team Rocket, https://x.test/a.pptx\n").expect("write roster");

    assert!(read_roster(&path).is_err());

    let _ = fs::remove_file(path);
}
