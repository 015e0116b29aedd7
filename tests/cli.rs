use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn textcheck() -> Command {
    let mut cmd = Command::cargo_bin("textcheck").unwrap();
    cmd.arg("--no-color");
    cmd
}

#[test]
fn test_stats_from_stdin() {
    textcheck()
        .arg("stats")
        .write_stdin("Hello world. How are you?")
        .assert()
        .success()
        .stdout(predicate::str::contains("Words"))
        .stdout(predicate::str::contains("25"));
}

#[test]
fn test_stats_json() {
    let output = textcheck()
        .args(["--format", "json", "stats"])
        .write_stdin("첫 줄입니다.\n\n둘째 줄! 셋째?")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["word_count"], 5);
    assert_eq!(stats["sentence_count"], 3);
    assert_eq!(stats["line_count"], 2);
}

#[test]
fn test_stats_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("input.txt");
    fs::write(&path, "one two three").unwrap();

    textcheck()
        .args(["stats", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("13"));
}

#[test]
fn test_stats_missing_file() {
    textcheck()
        .args(["stats", "/definitely/not/here.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn test_check_rejects_empty_input() {
    textcheck()
        .arg("check")
        .write_stdin("   \n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty input"));
}

#[test]
fn test_check_rejects_long_input_without_network() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("textcheck.toml");
    // An unroutable endpoint: reaching it would fail the test differently
    fs::write(
        &config,
        "endpoint = \"http://127.0.0.1:9/\"\nmax_attempts = 1\n",
    )
    .unwrap();

    let output = textcheck()
        .args(["--format", "json", "--config", config.to_str().unwrap(), "check"])
        .write_stdin("가".repeat(9000))
        .output()
        .unwrap();
    assert!(!output.status.success());

    let failure: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(failure["error"].as_str().unwrap().starts_with("too long"));
    assert_eq!(failure["alternatives"].as_array().unwrap().len(), 0);
}

#[test]
fn test_check_failure_lists_alternatives() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("textcheck.toml");
    fs::write(
        &config,
        "endpoint = \"http://127.0.0.1:9/\"\nmax_attempts = 1\ntimeout_ms = 2000\n",
    )
    .unwrap();

    let output = textcheck()
        .args(["--format", "json", "--config", config.to_str().unwrap(), "check"])
        .write_stdin("맞춤법 검사")
        .output()
        .unwrap();
    assert!(!output.status.success());

    let failure: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let alternatives = failure["alternatives"].as_array().unwrap();
    assert_eq!(alternatives.len(), 2);
    assert_eq!(alternatives[0]["url"], "http://speller.cs.pusan.ac.kr/");
}

#[test]
fn test_completion_script() {
    Command::cargo_bin("textcheck")
        .unwrap()
        .args(["--completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("textcheck"));
}
