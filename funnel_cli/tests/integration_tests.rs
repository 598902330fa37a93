//! Integration tests for the funnel binary.
//!
//! These tests verify end-to-end behavior including:
//! - Scripted replays of the catalog and quiz paths
//! - Guard and option rejections surfacing as failures
//! - The interactive shell driven over stdin
//! - Custom content files and validation

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a scratch directory for content files
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("funnel"))
}

fn replay_json(args: &[&str]) -> serde_json::Value {
    let output = cli()
        .arg("replay")
        .arg("--json")
        .args(args)
        .output()
        .expect("Failed to run replay");
    assert!(
        output.status.success(),
        "replay failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("Replay output is not JSON")
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Guided protocol selection funnel"));
}

#[test]
fn test_replay_quiz_path() {
    let state = replay_json(&["unknown", "answer:physical", "answer:strength", "answer:heavy"]);

    assert_eq!(state["screen"], "recommendation");
    assert_eq!(state["selected_medication_id"], "trt_inj");
    assert_eq!(
        state["answers"],
        serde_json::json!(["sermorelin", "trt_inj", "trt_inj"])
    );
}

#[test]
fn test_replay_catalog_path() {
    let state = replay_json(&["known", "select:nad_inj", "confirm"]);

    assert_eq!(state["screen"], "intake");
    assert_eq!(state["selected_medication_id"], "nad_inj");
}

#[test]
fn test_replay_explore_after_recommendation() {
    let state = replay_json(&[
        "unknown",
        "answer:physical",
        "answer:strength",
        "answer:heavy",
        "explore",
    ]);

    assert_eq!(state["screen"], "catalog");
    assert_eq!(state["selected_medication_id"], "trt_inj");
}

#[test]
fn test_replay_confirm_without_selection_fails() {
    cli()
        .args(["replay", "known", "confirm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GuardRejected"));
}

#[test]
fn test_replay_keep_going_stays_on_catalog() {
    cli()
        .args(["replay", "--keep-going", "known", "confirm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("screen: catalog"))
        .stdout(predicate::str::contains("selected: -"))
        .stderr(predicate::str::contains("Rejected 'confirm'"));
}

#[test]
fn test_replay_invalid_option_fails() {
    cli()
        .args(["replay", "unknown", "answer:heavy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidOption"));
}

#[test]
fn test_replay_unparseable_intent_fails() {
    cli()
        .args(["replay", "teleport"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized intent"));
}

#[test]
fn test_replay_text_output_mid_quiz() {
    cli()
        .args(["replay", "unknown", "answer:mental"])
        .assert()
        .success()
        .stdout(predicate::str::contains("screen: quiz"))
        .stdout(predicate::str::contains("question: 2/3"))
        .stdout(predicate::str::contains("answers: nad_inj"));
}

#[test]
fn test_interactive_quiz_to_intake() {
    cli()
        .arg("run")
        .write_stdin("n\n1\nstrength\nheavy\naccept\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("METRIC 01 / 03"))
        .stdout(predicate::str::contains("Recommended protocol: Injectable TRT"))
        .stdout(predicate::str::contains("CLINICAL VERIFICATION"))
        .stdout(predicate::str::contains("Personal Identification"));
}

#[test]
fn test_interactive_guard_then_select() {
    cli()
        .write_stdin("y\nconfirm\nprog\nconfirm\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("MEDICATION LIBRARY"))
        .stdout(predicate::str::contains("No medication selected"))
        .stdout(predicate::str::contains("Protocol: Progesterone"));
}

#[test]
fn test_interactive_eof_ends_session() {
    cli()
        .arg("run")
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Session ended on the catalog screen"));
}

#[test]
fn test_catalog_and_quiz_listing() {
    cli()
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("Menopause (HRT)"))
        .stdout(predicate::str::contains("non_h_parox"));

    cli()
        .arg("quiz")
        .assert()
        .success()
        .stdout(predicate::str::contains("Biological Friction"))
        .stdout(predicate::str::contains("Sedentary / Recovery -> b12_mic"));
}

#[test]
fn test_validate_embedded_content() {
    cli()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "13 medications in 3 categories, 3 questions",
        ));
}

#[test]
fn test_validate_reports_dangling_recommendation() {
    let temp_dir = setup_test_dir();
    let path = temp_dir.path().join("content.toml");

    let mut content = funnel_core::build_default_content();
    content.quiz.questions[0].options[0].recommended_medication_id = "unobtainium".into();
    fs::write(&path, content.to_toml_string().unwrap()).unwrap();

    cli()
        .arg("validate")
        .arg("--content")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown medication 'unobtainium'"));

    // Invalid content is refused before any session starts
    cli()
        .args(["replay", "known"])
        .arg("--content")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ContentValidation"));
}

#[test]
fn test_custom_content_file() {
    let temp_dir = setup_test_dir();
    let path = temp_dir.path().join("content.toml");
    fs::write(
        &path,
        r#"
[[catalog.categories]]
name = "Sleep"

[[catalog.categories.medications]]
id = "mag"
name = "Magnesium"
tag = "Mineral"
description = "Evening support."

[[quiz.questions]]
id = "rest"
title = "Rest"
prompt = "How do you sleep?"

[[quiz.questions.options]]
id = "poorly"
label = "Poorly"
sublabel = "Often awake"
recommended_medication_id = "mag"
"#,
    )
    .unwrap();

    let output = cli()
        .arg("--content")
        .arg(&path)
        .args(["replay", "--json", "unknown", "answer:poorly"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let state: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(state["screen"], "recommendation");
    assert_eq!(state["selected_medication_id"], "mag");
}
