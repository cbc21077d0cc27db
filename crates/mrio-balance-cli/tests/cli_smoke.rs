//! CLI binary smoke tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("mrio-balance").unwrap()
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("balance"))
        .stdout(predicate::str::contains("template"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mrio-balance"));
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

#[test]
fn template_prints_default_config() {
    cmd()
        .arg("template")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"max_iterations\""))
        .stdout(predicate::str::contains("\"output_file\""));
}

#[test]
fn balance_without_inputs_fails() {
    cmd()
        .arg("balance")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No config file provided"));
}

#[test]
fn balance_nonexistent_config_fails() {
    cmd()
        .args(["balance", "/nonexistent/balance.json"])
        .assert()
        .failure();
}

#[test]
fn balance_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let benchmark = dir.path().join("flows.csv");
    let rows = dir.path().join("rows.csv");
    let cols = dir.path().join("cols.csv");
    let output = dir.path().join("out.tsv");
    std::fs::write(&benchmark, "sector,a,b\na,2,-1\nb,0,3\n").unwrap();
    std::fs::write(&rows, "sector,total\na,2\nb,4\n").unwrap();
    std::fs::write(&cols, "sector,total\na,3\nb,3\n").unwrap();

    cmd()
        .arg("balance")
        .arg("-b")
        .arg(&benchmark)
        .arg("-r")
        .arg(&rows)
        .arg("-c")
        .arg(&cols)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"converged\": true"));

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("label\ta\tb"));
}
