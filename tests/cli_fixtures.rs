use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_gesture_cli"))
}

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

fn stdout_lines(output: &std::process::Output) -> Vec<Value> {
    String::from_utf8(output.stdout.clone())
        .expect("stdout utf8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect()
}

#[test]
fn validate_clean_graph_succeeds() {
    let output = cli()
        .args(["validate", "--graph", &fixture("presentation_graph.json")])
        .output()
        .expect("validate command");

    assert!(output.status.success(), "status {:?}", output.status.code());
    let issues: Value = serde_json::from_slice(&output.stdout).expect("issues json");
    assert_eq!(issues, Value::Array(vec![]));
}

#[test]
fn validate_broken_graph_exits_with_two() {
    let output = cli()
        .args(["validate", "--graph", &fixture("broken_graph.json")])
        .output()
        .expect("validate command");

    assert_eq!(output.status.code(), Some(2));
    let issues: Value = serde_json::from_slice(&output.stdout).expect("issues json");
    let kinds: Vec<&str> = issues
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|issue| issue["issue"].as_str())
        .collect();
    assert!(kinds.contains(&"duplicate_node_id"));
    assert!(kinds.contains(&"dangling_edge"));
}

#[test]
fn calibrate_writes_complete_table() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("thresholds.json");

    let output = cli()
        .args([
            "calibrate",
            "--config",
            &fixture("fast_calibration_config.json"),
            "--script",
            &fixture("calibration_script.json"),
            "--out",
            out.to_str().unwrap(),
        ])
        .output()
        .expect("calibrate command");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let written: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let table = written.as_object().expect("threshold map");
    assert_eq!(table.len(), 6);
    for (label, threshold) in table {
        let threshold = threshold.as_f64().unwrap();
        assert!((threshold - 0.68).abs() < 1e-3, "{label}: {threshold}");
    }
}

#[test]
fn calibrate_with_default_quota_fails_on_short_script() {
    let output = cli()
        .args(["calibrate", "--script", &fixture("calibration_script.json")])
        .output()
        .expect("calibrate command");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn present_prints_event_lines() {
    let output = cli()
        .args([
            "present",
            "--graph",
            &fixture("presentation_graph.json"),
            "--thresholds",
            &fixture("thresholds.json"),
            "--script",
            &fixture("live_script.json"),
        ])
        .output()
        .expect("present command");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let events = stdout_lines(&output);
    let slides: Vec<&str> = events
        .iter()
        .filter(|event| event["event"] == "slide_changed")
        .filter_map(|event| event["node_id"].as_str())
        .collect();
    assert_eq!(slides, vec!["intro", "demo", "map", "deploy"]);
    assert!(events
        .iter()
        .any(|event| event["event"] == "api_action_requested"));
}

#[test]
fn simulate_runs_with_jitter() {
    let output = cli()
        .args([
            "simulate",
            "--graph",
            &fixture("presentation_graph.json"),
            "--script",
            &fixture("live_script.json"),
            "--jitter",
            "0.05",
            "--seed",
            "7",
        ])
        .output()
        .expect("simulate command");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let events = stdout_lines(&output);
    assert_eq!(events[0]["event"], "slide_changed");
    assert_eq!(events[0]["node_id"], "intro");
}

#[test]
fn missing_script_is_an_error() {
    let output = cli()
        .args([
            "present",
            "--graph",
            &fixture("presentation_graph.json"),
            "--thresholds",
            &fixture("thresholds.json"),
            "--script",
            Path::new("does/not/exist.json").to_str().unwrap(),
        ])
        .output()
        .expect("present command");

    assert_eq!(output.status.code(), Some(1));
}
