// Integration tests for the votelens binary: --json stdout contract and
// exit codes.
//
// Run with: cargo test -p votelens-cli --test json_contract_tests -- --nocapture

use std::path::PathBuf;
use std::process::{Command, Output};

fn votelens() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_votelens"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd
}

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../analysis/tests/fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

fn run_ok(args: &[&str]) -> serde_json::Value {
    let output = votelens().args(args).output().expect("run votelens");
    assert!(
        output.status.success(),
        "exit code: {:?}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    assert_single_json(&String::from_utf8_lossy(&output.stdout))
}

fn run_err(args: &[&str]) -> Output {
    let output = votelens().args(args).output().expect("run votelens");
    assert!(!output.status.success(), "expected failure for {args:?}");
    output
}

/// Assert stdout is a single, parseable JSON value.
fn assert_single_json(stdout: &str) -> serde_json::Value {
    let trimmed = stdout.trim();
    assert!(!trimmed.is_empty(), "stdout should not be empty");
    serde_json::from_str(trimmed).unwrap_or_else(|e| {
        panic!("stdout must be valid JSON.\nParse error: {}\nstdout:\n{}", e, trimmed)
    })
}

// ===========================================================================
// JSON output
// ===========================================================================

#[test]
fn report_json_shape() {
    let data = fixture("votes.csv");
    let config = fixture("analysis.toml");
    let val = run_ok(&["report", &data, "--config", &config, "--json"]);

    let obj = val.as_object().expect("should be JSON object");
    for key in ["meta", "summary", "ranking", "trends", "periods"] {
        assert!(obj.contains_key(key), "must have '{key}' key");
    }
    assert_eq!(val["summary"]["total_votes"], 13);
    assert_eq!(val["summary"]["society_votes"], 6);
    assert_eq!(val["ranking"][0]["region"], "ge");
    assert_eq!(val["meta"]["keyword_preset"], "combined");
    assert_eq!(val["trends"]["interpretation"], "no_significant_trend");
}

#[test]
fn rank_top_truncates() {
    let data = fixture("votes.csv");
    let val = run_ok(&["rank", &data, "--top", "2", "--json"]);
    let ranking = val.as_array().expect("ranking must be array");
    assert_eq!(ranking.len(), 2);
    assert_eq!(ranking[0]["rank"], 1);
    assert_eq!(ranking[1]["region"], "zh");
}

#[test]
fn vote_profile_json() {
    let data = fixture("votes.csv");
    let val = run_ok(&["vote", &data, "ehe für alle", "--json"]);
    assert_eq!(val["profile"]["id"], "10");
    assert_eq!(val["statistics"]["highest"]["name"], "Zürich");
}

#[test]
fn periods_scheme_override() {
    let data = fixture("votes.csv");
    let val = run_ok(&["periods", &data, "--scheme", "fixed", "--width", "20", "--json"]);
    let labels: Vec<&str> = val["by_class"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["period"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["1980-1999", "2000-2019", "2020-2039", "unknown"]);
}

#[test]
fn output_file_matches_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("summary.json");
    let data = fixture("votes.csv");
    let stdout = run_ok(&["summary", &data, "--json", "--output", out.to_str().unwrap()]);
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(stdout, written);
}

#[test]
fn classify_export_is_reloaded_with_labels() {
    let dir = tempfile::tempdir().unwrap();
    let export = dir.path().join("labeled.csv");
    let data = fixture("votes.csv");
    let val = run_ok(&["classify", &data, "--export", export.to_str().unwrap(), "--json"]);
    assert_eq!(val["society_votes"], 6);

    let text = std::fs::read_to_string(&export).unwrap();
    assert!(text.lines().next().unwrap().ends_with("society_oriented"));

    // Reloading the export keeps the stored labels.
    let summary = run_ok(&["summary", export.to_str().unwrap(), "--json"]);
    assert_eq!(summary["society_votes"], 6);
}

#[test]
fn report_and_summary_agree_on_edited_labels() {
    let dir = tempfile::tempdir().unwrap();
    let export = dir.path().join("labeled.csv");
    let data = fixture("votes.csv");
    run_ok(&["classify", &data, "--export", export.to_str().unwrap(), "--json"]);

    // Mark vote 4 ("Steuergesetz") as society-oriented by hand.
    let text = std::fs::read_to_string(&export).unwrap();
    let edited: Vec<String> = text
        .lines()
        .map(|l| if l.starts_with("4;") { l.replace(";False", ";True") } else { l.to_string() })
        .collect();
    std::fs::write(&export, edited.join("\n")).unwrap();

    let path = export.to_str().unwrap();
    let report = run_ok(&["report", path, "--json"]);
    let summary = run_ok(&["summary", path, "--json"]);
    assert_eq!(report["meta"]["stored_labels"], true);
    assert_eq!(report["summary"]["society_votes"], 7);
    assert_eq!(report["summary"], summary);
}

// ===========================================================================
// Exit codes
// ===========================================================================

#[test]
fn missing_data_file() {
    let output = run_err(&["summary", "/nonexistent/votes.csv"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("file not found"));
}

#[test]
fn unknown_vote() {
    let data = fixture("votes.csv");
    let output = run_err(&["vote", &data, "Atomausstieg"]);
    assert_eq!(output.status.code(), Some(11));
    assert!(String::from_utf8_lossy(&output.stderr).contains("hint:"));
}

#[test]
fn invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "[periods]\nscheme = \"fixed\"\nwidth = 0\n").unwrap();
    let output = run_err(&["validate", config.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(6));
}

#[test]
fn validate_fixture_config() {
    let output = votelens()
        .args(["validate", &fixture("analysis.toml")])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ok"));
}
