//! Integration tests for the `seazen` CLI binary.
//!
//! Argument parsing, help, completions and config plumbing run without a
//! lamp; the lamp-facing tests stand one up with wiremock.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `seazen` binary with env isolation.
///
/// Clears all `SEAZEN_*` env vars and points config and data directories
/// into `home` so tests never touch the user's real files.
fn seazen_cmd(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("seazen");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("SEAZEN_PROFILE")
        .env_remove("SEAZEN_ADDRESS")
        .env_remove("SEAZEN_AP_ORIGIN")
        .env_remove("SEAZEN_MDNS_HOST")
        .env_remove("SEAZEN_TIMEOUT")
        .env_remove("SEAZEN_OUTPUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary off the async runtime so the mock lamp keeps serving.
async fn run(home: &TempDir, args: Vec<String>) -> std::process::Output {
    let mut cmd = seazen_cmd(home);
    cmd.args(args);
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

/// A lamp that answers info and state reads.
async fn lamp() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ver": "0.14.4",
            "name": "Seazen",
            "ip": "10.0.0.5",
            "leds": { "count": 60 }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/json/state"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "on": true, "bri": 128, "ps": 3 })),
        )
        .mount(&server)
        .await;
    server
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_owned()).collect()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = seazen_cmd(&home).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    seazen_cmd(&home).arg("--help").assert().success().stdout(
        predicate::str::contains("Seazen")
            .and(predicate::str::contains("onboard"))
            .and(predicate::str::contains("discover"))
            .and(predicate::str::contains("brightness")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    seazen_cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("seazen"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    seazen_cmd(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("seazen"));
}

#[test]
fn test_completions_zsh() {
    let home = TempDir::new().unwrap();
    seazen_cmd(&home)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_unknown_shell() {
    let home = TempDir::new().unwrap();
    seazen_cmd(&home)
        .args(["completions", "tcsh"])
        .assert()
        .code(2);
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn test_brightness_out_of_range() {
    let home = TempDir::new().unwrap();
    let output = seazen_cmd(&home)
        .args(["brightness", "256"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("256"));
}

#[test]
fn test_use_ip_requires_address() {
    let home = TempDir::new().unwrap();
    seazen_cmd(&home).arg("use-ip").assert().code(2);
}

#[test]
fn test_onboard_needs_terminal() {
    let home = TempDir::new().unwrap();
    seazen_cmd(&home)
        .arg("onboard")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("interactive terminal"));
}

// ── Config plumbing ─────────────────────────────────────────────────

#[test]
fn test_config_path() {
    let home = TempDir::new().unwrap();
    seazen_cmd(&home).args(["config", "path"]).assert().success().stdout(
        predicate::str::contains("config.toml").and(predicate::str::contains("state.toml")),
    );
}

#[test]
fn test_config_show_json_defaults() {
    let home = TempDir::new().unwrap();
    let output = seazen_cmd(&home)
        .args(["config", "show", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let cfg: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(cfg["default_profile"], "default");
    assert_eq!(cfg["defaults"]["timeout_ms"], 4500);
}

#[test]
fn test_unknown_profile() {
    let home = TempDir::new().unwrap();
    let output = seazen_cmd(&home)
        .args(["--profile", "attic", "state"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("Profile 'attic' not found"));
}

#[test]
fn test_invalid_ap_origin() {
    let home = TempDir::new().unwrap();
    seazen_cmd(&home)
        .args(["--ap-origin", "ftp://4.3.2.1", "check"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("ap_origin"));
}

#[test]
fn test_where_with_nothing_remembered() {
    let home = TempDir::new().unwrap();
    seazen_cmd(&home)
        .arg("where")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No lamp address remembered"));
}

#[test]
fn test_invalid_address() {
    let home = TempDir::new().unwrap();
    seazen_cmd(&home)
        .args(["--no-save", "use-ip", "   "])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid lamp address"));
}

// ── Against a lamp ──────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_use_ip_remembers_address() {
    let home = TempDir::new().unwrap();
    let server = lamp().await;
    let address = server.address().to_string();
    let origin = format!("http://{address}");

    let output = run(&home, args(&["-o", "plain", "use-ip", &address])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), origin);

    let output = run(&home, args(&["-o", "plain", "where"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), origin);

    let output = run(&home, args(&["forget"])).await;
    assert!(output.status.success());
    let output = run(&home, args(&["-o", "plain", "where"])).await;
    assert!(String::from_utf8_lossy(&output.stdout).trim().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_state_as_json() {
    let home = TempDir::new().unwrap();
    let server = lamp().await;
    let address = server.address().to_string();

    let output = run(
        &home,
        args(&["--no-save", "--address", &address, "-o", "json", "state"]),
    )
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let state: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(state["on"], true);
    assert_eq!(state["bri"], 128);
    assert_eq!(state["ps"], 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_info_table() {
    let home = TempDir::new().unwrap();
    let server = lamp().await;
    let address = server.address().to_string();

    let output = run(&home, args(&["--no-save", "--address", &address, "info"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Seazen"), "{stdout}");
    assert!(stdout.contains("LEDs:       60"), "{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_brightness_posts_update() {
    let home = TempDir::new().unwrap();
    let server = lamp().await;
    Mock::given(method("POST"))
        .and(path("/json/state"))
        .and(body_json(json!({ "bri": 200, "v": true })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "on": true, "bri": 200, "ps": -1 })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let address = server.address().to_string();

    let output = run(
        &home,
        args(&["--no-save", "-a", &address, "-o", "json-compact", "brightness", "200"]),
    )
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let state: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(state["bri"], 200);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_lamp_exit_code() {
    let home = TempDir::new().unwrap();
    // Bind then drop to get a port nothing listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let output = run(
        &home,
        args(&[
            "--no-save",
            "--timeout",
            "500",
            "--address",
            &format!("127.0.0.1:{port}"),
            "on",
        ]),
    )
    .await;
    let code = output.status.code();
    assert!(
        code == Some(7) || code == Some(8),
        "expected connection or timeout exit code, got {code:?}:\n{}",
        combined_output(&output)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_http_error_is_reported() {
    let home = TempDir::new().unwrap();
    let server = lamp().await;
    Mock::given(method("POST"))
        .and(path("/json/state"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    let address = server.address().to_string();

    let output = run(&home, args(&["--no-save", "-a", &address, "--trace", "off"])).await;
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("HTTP 500"), "{stderr}");
    // --trace dumps the diagnostic trace after the error path too.
    assert!(stderr.contains("Checking user-entered address"), "{stderr}");
}
