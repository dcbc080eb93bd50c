use assert_cmd::Command;
use predicates::prelude::*;

fn keepwatch(data_dir: &std::path::Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("keepwatch"));
    cmd.env_remove("KEEPWATCH_DATA_DIR")
        .env_remove("KEEPWATCH_LOG_STDERR")
        .env("RUST_LOG", "info")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

#[test]
fn status_without_record_is_zero() {
    let dir = tempfile::tempdir().expect("tempdir");
    keepwatch(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("00:00:00 (0 ms)"));
}

#[test]
fn status_reports_saved_time() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("stopwatch.json"), r#"{"elapsedMs":3725000}"#)
        .expect("write");

    keepwatch(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("01:02:05 (3725000 ms)"));

    keepwatch(dir.path())
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::diff("{\"elapsedMs\":3725000}\n"));
}

#[test]
fn status_treats_malformed_record_as_zero() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("stopwatch.json"), "{\"elapsed\":12}").expect("write");

    keepwatch(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("00:00:00 (0 ms)"))
        .stderr(predicate::str::contains("Ignoring unreadable record"));
}

#[test]
fn reset_overwrites_record_with_zero() {
    let dir = tempfile::tempdir().expect("tempdir");
    let nested = dir.path().join("not-yet-created");

    keepwatch(&nested).arg("reset").assert().success();

    let on_disk = std::fs::read_to_string(nested.join("stopwatch.json")).expect("read");
    let value: serde_json::Value = serde_json::from_str(&on_disk).expect("json");
    assert_eq!(value, serde_json::json!({ "elapsedMs": 0 }));
}

#[test]
fn path_prints_record_location() {
    let dir = tempfile::tempdir().expect("tempdir");
    keepwatch(dir.path())
        .arg("path")
        .assert()
        .success()
        .stdout(predicate::str::contains("stopwatch.json"));
}
