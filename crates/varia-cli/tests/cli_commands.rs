//! Integration tests for the varia CLI commands.

#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Write a narrative file into a fresh temp directory.
fn scene(source: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tavern.txt");
    fs::write(&path, source).unwrap();
    (dir, path)
}

fn varia() -> Command {
    Command::cargo_bin("varia").unwrap()
}

const TAVERN: &str = "The barkeep {&nods|grunts|waves}. {gold >= 10: \"Welcome!\"|\"Out.\"}\n{!\n- First visit.\n- Second visit.\n}\n";

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_lists_directives() {
    let (_dir, path) = scene(TAVERN);
    varia()
        .args(["check", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("tavern@12")
                .and(predicate::str::contains("cycle"))
                .and(predicate::str::contains("gold >= 10"))
                .and(predicate::str::contains("multi-line"))
                .and(predicate::str::contains("All checks passed")),
        );
}

#[test]
fn check_reports_unterminated_directive() {
    let (_dir, path) = scene("{stopping: A|B");
    varia()
        .args(["check", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("unterminated")
                .and(predicate::str::contains("error: syntax error at 1:15")),
        );
}

#[test]
fn check_reports_conditional_arity() {
    let (_dir, path) = scene("{ready: a|b|c}");
    varia()
        .args(["check", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected 1 or 2"));
}

#[test]
fn check_plain_text() {
    let (_dir, path) = scene("Nothing happens here.");
    varia()
        .args(["check", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("no directives"));
}

#[test]
fn check_missing_file() {
    varia()
        .args(["check", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

// ---------------------------------------------------------------------------
// tree
// ---------------------------------------------------------------------------

#[test]
fn tree_prints_outline() {
    let (_dir, path) = scene("Hi {A|{&x|y}}");
    varia()
        .args(["tree", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#""Hi " (stopping ("A") ((cycle ("x") ("y"))))"#,
        ));
}

// ---------------------------------------------------------------------------
// render
// ---------------------------------------------------------------------------

#[test]
fn render_repeated_visits() {
    let (_dir, path) = scene(TAVERN);
    varia()
        .args(["render", path.to_str().unwrap(), "-n", "3", "--vars", r#"{"gold": 12}"#])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("The barkeep nods. \"Welcome!\"\nFirst visit.")
                .and(predicate::str::contains("The barkeep grunts. \"Welcome!\"\nSecond visit."))
                .and(predicate::str::contains("The barkeep waves. \"Welcome!\"\n\n")),
        );
}

#[test]
fn render_missing_variable_fails() {
    let (_dir, path) = scene(TAVERN);
    varia()
        .args(["render", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown variable: gold"));
}

#[test]
fn render_rejects_bad_vars() {
    let (_dir, path) = scene(TAVERN);
    varia()
        .args(["render", path.to_str().unwrap(), "--vars", "[1, 2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --vars"));
}

#[test]
fn render_state_file_persists_sequences() {
    let (dir, path) = scene("{!Creak.|Silence.}");
    let state = dir.path().join("state.json");
    let args = [
        "render",
        path.to_str().unwrap(),
        "--state",
        state.to_str().unwrap(),
    ];

    varia()
        .args(args)
        .assert()
        .success()
        .stdout(predicate::str::contains("Creak."));
    assert!(fs::read_to_string(&state).unwrap().contains("\"tavern@0\""));

    varia()
        .args(args)
        .assert()
        .success()
        .stdout(predicate::str::contains("Silence."));
}

#[test]
fn render_same_seed_same_output() {
    let (_dir, path) = scene("{~a|b|c|d|e|f}");
    let run = || {
        varia()
            .args(["render", path.to_str().unwrap(), "-n", "6", "--seed", "7"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}
