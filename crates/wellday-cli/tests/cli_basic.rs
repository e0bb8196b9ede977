//! Basic CLI E2E tests.
//!
//! Tests run the built binary against a temporary data directory and verify
//! outputs.

use std::path::Path;
use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_wellday-cli"))
        .args(args)
        .env("WELLDAY_DATA_DIR", data_dir)
        .env_remove("WELLDAY_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_json(data_dir: &Path, args: &[&str]) -> Value {
    let (code, stdout, stderr) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_water_add_twice() {
    let dir = TempDir::new().unwrap();
    run_json(dir.path(), &["water", "add", "250", "--date", "2024-05-20"]);
    let status = run_json(dir.path(), &["water", "add", "250", "--date", "2024-05-20"]);
    assert_eq!(status["intake"], 500.0);
    assert_eq!(status["percentage"], 25);
    assert_eq!(status["remaining"], 1500);
    assert_eq!(status["glasses"].as_array().unwrap().len(), 2);
}

#[test]
fn test_water_add_uses_configured_glass() {
    let dir = TempDir::new().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["config", "set", "water.glass_ml", "330"]);
    assert_eq!(code, 0);
    let status = run_json(dir.path(), &["water", "add", "--date", "2024-05-20"]);
    assert_eq!(status["intake"], 330.0);
}

#[test]
fn test_food_add_and_remove() {
    let dir = TempDir::new().unwrap();
    let day = run_json(
        dir.path(),
        &[
            "food", "add", "breakfast", "Egg", "--calories", "70", "--proteins", "6", "--fats", "5", "--carbs", "1",
            "--date", "2024-05-20",
        ],
    );
    assert_eq!(day["total"]["calories"], 70.0);

    let removed = run_json(dir.path(), &["food", "remove", "breakfast", "0", "--date", "2024-05-20"]);
    assert_eq!(removed["name"], "Egg");

    let day = run_json(dir.path(), &["food", "show", "--date", "2024-05-20"]);
    assert_eq!(day["total"]["calories"], 0.0);
    assert_eq!(day["total"]["carbs"], 0.0);
}

#[test]
fn test_food_add_from_catalog() {
    let dir = TempDir::new().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["product", "add", "Banana", "89", "1.1", "0.3", "23"]);
    assert_eq!(code, 0);
    let day = run_json(dir.path(), &["food", "add", "lunch", "banana", "--date", "2024-05-20"]);
    assert_eq!(day["lunch"][0]["name"], "Banana");
    assert_eq!(day["total"]["calories"], 89.0);

    let series = run_json(dir.path(), &["food", "series", "--days", "2", "--date", "2024-05-21"]);
    assert_eq!(series[0]["value"], 89.0);
    assert_eq!(series[1]["value"], 0.0);
}

#[test]
fn test_habit_streak_and_relapse() {
    let dir = TempDir::new().unwrap();
    let created = run_json(dir.path(), &["habit", "add", "Smoking", "--icon", "🚬"]);
    let id = created["id"].as_u64().unwrap().to_string();
    assert_eq!(id, "4");

    let summary = run_json(dir.path(), &["habit", "clean", &id]);
    assert_eq!(summary["streak"], 1);

    let summary = run_json(dir.path(), &["habit", "relapse", &id]);
    assert_eq!(summary["streak"], 0);
    assert_eq!(summary["today"], "relapse");
    assert_eq!(summary["relapses"], 1);
}

#[test]
fn test_unknown_habit_fails() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["habit", "show", "42"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_profile_intake() {
    let dir = TempDir::new().unwrap();
    run_json(
        dir.path(),
        &[
            "profile", "set", "--age", "30", "--weight", "70", "--height", "175", "--sex", "male", "--activity",
            "1.55",
        ],
    );
    let (code, stdout, _) = run_cli(dir.path(), &["profile", "intake"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "2555");
}

#[test]
fn test_invalid_date_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["water", "add", "250", "--date", "2024-02-30"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_get_unknown_key() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "storage.backend"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "sqlite");
    let (code, _, _) = run_cli(dir.path(), &["config", "get", "theme"]);
    assert_eq!(code, 1);
}

#[test]
fn test_non_finite_amount_is_rejected() {
    let dir = TempDir::new().unwrap();
    run_json(
        dir.path(),
        &["food", "add", "lunch", "Rice", "--calories", "130", "--date", "2024-05-19"],
    );
    let (code, _, stderr) = run_cli(
        dir.path(),
        &["food", "add", "lunch", "Bad", "--calories", "NaN", "--date", "2024-05-20"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("calories"));

    let series = run_json(dir.path(), &["food", "series", "--days", "2", "--date", "2024-05-20"]);
    assert_eq!(series[0]["value"], 130.0);
}

#[test]
fn test_unset_current_day_loads_quietly() {
    let dir = TempDir::new().unwrap();
    run_cli(dir.path(), &["config", "set", "storage.backend", "files"]);
    let store = dir.path().join("store");
    std::fs::create_dir_all(&store).unwrap();
    std::fs::write(store.join("calendar_currentDay.json"), "{}").unwrap();
    std::fs::write(store.join("water_currentDay.json"), "{}").unwrap();

    let (code, _, stderr) = run_cli(dir.path(), &["water", "add", "200", "--date", "2024-05-20"]);
    assert_eq!(code, 0);
    assert!(!stderr.contains("WARN"), "{stderr}");
}

#[test]
fn test_files_backend() {
    let dir = TempDir::new().unwrap();
    run_cli(dir.path(), &["config", "set", "storage.backend", "files"]);
    run_json(dir.path(), &["water", "add", "200", "--date", "2024-05-20"]);
    assert!(dir.path().join("store").join("water_calendar.json").exists());
}
