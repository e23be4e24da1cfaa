//! CLI integration tests

use std::io::Write;
use std::process::{Command, Output};

fn monitorctl(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_monitorctl"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("MONITOR_HISTORICAL_DATA_PATH")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = monitorctl(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("timeline"), "Should show timeline command");
    assert!(stdout.contains("locator"), "Should show locator command");
    assert!(stdout.contains("message"), "Should show message command");
    assert!(stdout.contains("allowance"), "Should show allowance command");
}

/// Test allowance subcommand help
#[test]
fn test_allowance_help() {
    let output = monitorctl(&["allowance", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Allowance help should succeed");
    assert!(stdout.contains("--never-fail"), "Should show never-fail option");
    assert!(stdout.contains("--alert"), "Should show alert option");
    assert!(stdout.contains("--data"), "Should show data option");
}

#[test]
fn test_timeline_json_output() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        br#"[
            {"locator": "ns/a pod/p1 uid/1", "message": "ready",
             "from": "2023-11-14T22:13:20Z", "to": "2023-11-14T22:13:20Z"},
            {"locator": "ns/b pod/p2 uid/2", "message": "constructed",
             "from": "2023-11-14T22:13:40Z", "to": "2023-11-14T22:13:40Z"},
            {"locator": "ns/a pod/p1 uid/1", "message": "constructed",
             "from": "2023-11-14T22:13:30Z", "to": "2023-11-14T22:13:30Z"}
        ]"#,
    )
    .unwrap();

    let path = file.path().to_str().unwrap();
    let output = monitorctl(&["timeline", path, "--format", "json"]);
    assert!(output.status.success(), "Timeline should succeed");

    let sorted: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let order: Vec<(&str, &str)> = sorted
        .as_array()
        .unwrap()
        .iter()
        .map(|i| {
            (
                i["locator"].as_str().unwrap(),
                i["message"].as_str().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        order,
        vec![
            ("ns/a pod/p1 uid/1", "constructed"),
            ("ns/b pod/p2 uid/2", "constructed"),
            ("ns/a pod/p1 uid/1", "ready"),
        ]
    );
}

#[test]
fn test_timeline_missing_file_fails() {
    let output = monitorctl(&["timeline", "/nonexistent/intervals.json"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read intervals"));
}

#[test]
fn test_locator_json_output() {
    let output = monitorctl(&[
        "locator",
        "ns/default pod/web node/n1 uid/u1 container/nginx",
        "--format",
        "json",
    ]);
    assert!(output.status.success());

    let decoded: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(decoded["non_unique"], "ns/default pod/web");
    assert_eq!(decoded["container"]["container_name"], "nginx");
    assert_eq!(decoded["pod"]["uid"], "u1");
}

#[test]
fn test_allowance_json_output() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        br#"[{"AlertName": "TargetDown", "AlertNamespace": "openshift-monitoring",
              "Release": "4.12", "Platform": "aws", "Architecture": "amd64",
              "Network": "ovn", "Topology": "ha", "P95": 30, "P99": 300}]"#,
    )
    .unwrap();

    let output = monitorctl(&[
        "allowance",
        "--data",
        file.path().to_str().unwrap(),
        "--alert",
        "TargetDown",
        "--alert-namespace",
        "openshift-monitoring",
        "--release",
        "4.12",
        "--platform",
        "aws",
        "--network",
        "ovn",
        "--format",
        "json",
    ]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["flake_after_secs"], 30.0);
    assert_eq!(report["fail_after_secs"], 300.0);
    assert_eq!(report["never_fail"], false);
}
