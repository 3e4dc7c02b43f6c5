//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. They use the
//! dev config directory so they never touch a real user config.

use std::process::Command;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(args: &[&str]) -> (i32, String, String) {
    let output = Command::new("cargo")
        .args(["run", "-p", "cueclock-cli", "--"])
        .args(args)
        .env("CUECLOCK_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

#[test]
fn test_cues_lists_catalog() {
    let (code, stdout, _) = run_cli(&["cues"]);
    assert_eq!(code, 0, "cues failed");
    assert!(stdout.contains("blackout"));
    assert!(stdout.contains("gameover"));
}

#[test]
fn test_cues_json_parses() {
    let (code, stdout, _) = run_cli(&["cues", "--json"]);
    assert_eq!(code, 0, "cues --json failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let catalog = parsed.as_array().unwrap();
    assert!(!catalog.is_empty());
    assert!(catalog.iter().all(|c| c.get("id").is_some()));
}

#[test]
fn test_schedule_preview_resolves_offsets() {
    let (code, stdout, _) = run_cli(&[
        "schedule", "preview", "--minutes", "60", "--cue", "5min", "--cue", "gameover",
    ]);
    assert_eq!(code, 0, "schedule preview failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["entries"]["5min"], 300);
    assert_eq!(parsed["entries"]["gameover"], 5);
}

#[test]
fn test_schedule_preview_skips_unknown_ids() {
    let (code, stdout, _) = run_cli(&["schedule", "preview", "--minutes", "60", "--cue", "bogus"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(parsed["entries"].as_object().unwrap().is_empty());
}

#[test]
fn test_config_list_is_json() {
    let (code, stdout, _) = run_cli(&["config", "list"]);
    assert_eq!(code, 0, "config list failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(parsed.get("run").is_some());
}

#[test]
fn test_config_get_default_minutes() {
    let (code, stdout, _) = run_cli(&["config", "get", "run.default_minutes"]);
    assert_eq!(code, 0, "config get failed");
    assert!(!stdout.trim().is_empty());
}

#[test]
fn test_config_get_unknown_key_fails() {
    let (code, _, stderr) = run_cli(&["config", "get", "run.bogus"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_run_rejects_zero_minutes() {
    let (code, _, stderr) = run_cli(&["run", "--minutes", "0", "--cue", "gameover"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}
