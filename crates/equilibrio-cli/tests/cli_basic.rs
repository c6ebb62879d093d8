//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data
//! directory, so nothing touches the user's real state.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_equilibrio"))
        .args(args)
        .env("EQUILIBRIO_DATA_DIR", data_dir)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("stdout should be JSON")
}

#[test]
fn test_routine_list_shows_builtins() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["routine", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("* Mañana Productiva"), "{stdout}");
    assert!(stdout.contains("El Cambio"));
}

#[test]
fn test_status_inside_sacred_block_is_locked() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, stderr) =
        run_cli(dir.path(), &["status", "--at", "13:30", "--date", "2026-10-19"]);
    assert_eq!(code, 0, "{stderr}");
    let status = json(&stdout);
    assert_eq!(status["locked"], true);
    assert_eq!(status["location"]["active"]["block"]["id"], "mp-6");
    assert_eq!(status["nextStart"], "14:00");
}

#[test]
fn test_status_outside_sacred_block_is_unlocked() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["status", "--at", "09:00", "--date", "2026-10-19"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["locked"], false);
}

#[test]
fn test_status_rejects_bad_time() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["status", "--at", "25:61"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_import_select_and_status() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("night.json");
    std::fs::write(
        &file,
        r#"{
            "id": "noche",
            "name": "Noche",
            "blocks": [
                {"id": "n1", "time": "21:00", "activity": "Lectura", "type": "sacred"},
                {"id": "n2", "time": "22:00", "activity": "Dormir", "type": "personal"}
            ]
        }"#,
    )
    .unwrap();

    let (code, stdout, stderr) = run_cli(dir.path(), &["routine", "import", file.to_str().unwrap()]);
    assert_eq!(code, 0, "{stderr}");
    assert!(stdout.contains("RoutineUpdated"));

    let (code, _, _) = run_cli(dir.path(), &["routine", "select", "noche"]);
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(dir.path(), &["status", "--at", "21:15", "--date", "2026-10-19"]);
    assert_eq!(code, 0);
    let status = json(&stdout);
    assert_eq!(status["routineId"], "noche");
    assert_eq!(status["locked"], true);
}

#[test]
fn test_delete_selected_routine_reselects() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["routine", "delete", "Mañana Productiva"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("RoutineDeleted"));

    let (_, stdout, _) = run_cli(dir.path(), &["routine", "list"]);
    assert!(!stdout.contains("Mañana Productiva"));
    assert!(stdout.lines().any(|l| l.starts_with('*')));
}

#[test]
fn test_delete_unknown_routine_fails() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["routine", "delete", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("not found"), "{stderr}");
}

#[test]
fn test_goal_add_and_list() {
    let dir = TempDir::new().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["goal", "add", "Caminar 30 minutos", "--period", "diario"]);
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(dir.path(), &["goal", "list", "--json"]);
    assert_eq!(code, 0);
    let goals = json(&stdout);
    let goals = goals.as_array().unwrap();
    assert_eq!(goals.len(), 3, "two seed goals plus the new one");
    assert_eq!(goals[2]["text"], "Caminar 30 minutos");
    assert_eq!(goals[2]["period"], "diario");
}

#[test]
fn test_settings_reject_invalid_vitamin_d_time() {
    let dir = TempDir::new().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["settings", "set", "--vitamin-d-time", "mediodía"]);
    assert_eq!(code, 1);

    let (code, stdout, _) = run_cli(dir.path(), &["settings", "set", "--vitamin-d-time", "9:30"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["vitaminDTime"], "09:30");
}

#[test]
fn test_config_tick_interval_is_bounded() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["config", "set", "engine.tick_interval_secs", "30"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("outside 1..=10s"), "{stderr}");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "engine.tick_interval_secs", "5"]);
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "engine.tick_interval_secs"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "5");

    let (code, stdout, _) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.lines().any(|l| l == "engine.tick_interval_secs = 5"), "{stdout}");
}

#[test]
fn test_config_unknown_key_fails() {
    let dir = TempDir::new().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);
}
