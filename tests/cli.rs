use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const METHODS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/methods.json");

#[test]
fn test_process_text_output() {
    let mut cmd = Command::cargo_bin("trycatch-regions").unwrap();
    cmd.args(["process", METHODS, "--method", "Branchy.run"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("method Branchy.run"))
        .stdout(predicate::str::contains(
            "wrapped: 1, failed: 0, dropped: 0, passes: 1",
        ))
        .stdout(predicate::str::contains("Sequence [try #0]"));
}

#[test]
fn test_process_reports_fatal_method_and_continues() {
    let mut cmd = Command::cargo_bin("trycatch-regions").unwrap();
    cmd.args(["process", METHODS]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("method Branchy.run"))
        .stdout(predicate::str::contains("method Broken.run"))
        .stdout(predicate::str::contains("Exception block dominator not found"))
        .stdout(predicate::str::contains("TryCatchFallback"));
}

#[test]
fn test_process_json_output_to_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("report.json");

    let mut cmd = Command::cargo_bin("trycatch-regions").unwrap();
    cmd.args(["process", METHODS, "--format", "json", "--validate", "-o"])
        .arg(&out);
    cmd.assert().success();

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let methods = report.as_array().unwrap();
    assert_eq!(methods.len(), 2);
    assert_eq!(methods[0]["name"], "Branchy.run");
    assert_eq!(methods[0]["wrapped"], 1);
    let root_children = methods[0]["regions"]["children"].as_array().unwrap();
    assert_eq!(root_children.len(), 4);
    assert_eq!(root_children[1]["region"]["try_block"], 0);
    assert!(methods[1]["error"].as_str().unwrap().contains("Broken.run"));
}

#[test]
fn test_unknown_method_fails() {
    let mut cmd = Command::cargo_bin("trycatch-regions").unwrap();
    cmd.args(["process", METHODS, "--method", "Missing.run"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unknown method: Missing.run"));
}

#[test]
fn test_dot_export() {
    let mut cmd = Command::cargo_bin("trycatch-regions").unwrap();
    cmd.args(["dot", METHODS, "--method", "Branchy.run"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("digraph CFG {"))
        .stdout(predicate::str::contains("subgraph cluster_try_0"))
        .stdout(predicate::str::contains("peripheries=2"));
}
