//! Integration tests for the CLI interface
//!
//! Tests argument handling and full `create` runs of the binary

mod common;

use assert_cmd::Command;
use common::{event, metric, FakeApi};
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::cargo_bin("insights-report").unwrap()
}

/// Runs the binary off the async runtime so the fake API keeps serving
async fn run_create(dir: &Path, args: Vec<String>) -> assert_cmd::assert::Assert {
    let dir = dir.to_path_buf();
    tokio::task::spawn_blocking(move || cmd().current_dir(dir).arg("create").args(args).assert())
        .await
        .unwrap()
}

fn fake_api() -> FakeApi {
    FakeApi::new("Payments")
        .with_events(vec![
            event(0, 0, Some(&["a"])),
            event(1, 1, None),
            event(0, 0, Some(&["a", "b"])),
        ])
        .with_metrics(vec![
            metric(true, 200, 10.0, 20.0, "f1"),
            metric(false, 0, 15.0, 25.0, "f1"),
            metric(true, 200, 1.0, 2.0, "f2"),
        ])
}

#[test]
fn test_cli_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("create"));
}

#[test]
fn test_create_help() {
    cmd()
        .args(["create", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("The start date in the YYYY/MM/DD format"))
        .stdout(predicate::str::contains("--hook"));
}

#[test]
fn test_create_requires_hook() {
    cmd()
        .args(["create", "--start", "2024/01/01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_invalid_date_fails_before_any_request() {
    let dir = TempDir::new().unwrap();

    cmd()
        .current_dir(dir.path())
        .args(["create", "-s", "yesterday", "-k", "http://127.0.0.1:9/hook"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid date"));

    assert!(!dir.path().join("out.txt").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_renders_template() {
    let fake = fake_api();
    let hook = fake.serve().await;

    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("templates")).unwrap();
    std::fs::write(
        dir.path().join("templates").join("summary.txt"),
        "{{ name }} {{ start }}..{{ end }}\n\
         events {{ events.global.successes }}/{{ events.global.failures }}/{{ events.global.criticals }}\n\
         {% for tag in events.tags %}{{ tag.key }}:{{ tag.value.successes }}+{{ tag.value.failures }} {% endfor %}\n\
         {% for fp in metrics.footprints %}{{ fp.key }}:{{ fp.value.mean_fetch | fixed }}/{{ fp.value.mean_latency | fixed }} {% endfor %}\n",
    )
    .unwrap();

    run_create(
        dir.path(),
        vec![
            "-s".into(),
            "2024/03/01".into(),
            "-e".into(),
            "2024/03/31".into(),
            "-k".into(),
            hook,
            "-T".into(),
            "summary.txt".into(),
            "-o".into(),
            "report.txt".into(),
        ],
    )
    .await
    .success();

    let output = std::fs::read_to_string(dir.path().join("report.txt")).unwrap();
    let lines: Vec<_> = output.lines().collect();
    assert_eq!(lines[0], "Payments 2024/03/01..2024/03/31");
    assert_eq!(lines[1], "events 2/1/1");
    assert_eq!(lines[2].trim_end(), "a:2+0 b:1+0 untagged:0+1");
    assert_eq!(lines[3].trim_end(), "f1:12.50/22.50 f2:1.00/2.00");

    let query = &fake.event_queries()[0];
    assert_eq!(query.offset, 0);
    assert_eq!(query.limit, 500);
    assert_eq!(query.from, 1_709_251_200_000);
    assert_eq!(query.to, 1_711_843_200_000);
    assert_eq!(fake.metric_queries()[0].limit, 1000);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_without_template_dumps_json_to_default_output() {
    let fake = fake_api();
    let hook = fake.serve().await;
    let dir = TempDir::new().unwrap();

    run_create(
        dir.path(),
        vec!["-s".into(), "2024/03/01".into(), "-k".into(), hook],
    )
    .await
    .success();

    let output = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["name"], "Payments");
    assert_eq!(value["metrics"]["global"]["criticals"], 1);
    assert_eq!(value["events"]["tags"]["untagged"]["failures"], 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_api_failure_exits_with_error_and_writes_nothing() {
    let fake = fake_api().failing_metrics();
    let hook = fake.serve().await;
    let dir = TempDir::new().unwrap();

    run_create(
        dir.path(),
        vec!["-s".into(), "2024/03/01".into(), "-k".into(), hook],
    )
    .await
    .code(1)
    .stderr(predicate::str::contains("Failed to collect report data"));

    assert!(!dir.path().join("out.txt").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_write_failure_does_not_fail_the_command() {
    let fake = fake_api();
    let hook = fake.serve().await;
    let dir = TempDir::new().unwrap();

    run_create(
        dir.path(),
        vec![
            "-s".into(),
            "2024/03/01".into(),
            "-k".into(),
            hook,
            "-o".into(),
            "missing/dir/out.txt".into(),
        ],
    )
    .await
    .success();
}
