//! CLI end-to-end tests
//!
//! Tests for the hlsdeck command-line interface. Every command runs in a
//! scratch directory with its own HOME so no user config is picked up.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Get a command for the hlsdeck binary, isolated in `dir`
#[allow(deprecated)]
fn hlsdeck_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hlsdeck").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("HLSDECK_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("hlsdeck.toml");
    fs::write(&path, content).unwrap();
    path
}

const PASTED_RESPONSE: &str = r#"{
  "success": true,
  "data": {
    "masterUrl": "https://cdn.test/p/master.m3u8",
    "variantUrls": {"480p": "https://cdn.test/p/480p.m3u8"},
    "videoId": "p",
    "videoPath": "uploads/p"
  }
}"#;

#[test]
fn test_cli_no_args_shows_help() {
    let dir = tempdir().unwrap();
    hlsdeck_cmd(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let dir = tempdir().unwrap();
    hlsdeck_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("hlsdeck"))
        .stdout(predicate::str::contains("upload"))
        .stdout(predicate::str::contains("play"));
}

#[test]
fn test_cli_version_command() {
    let dir = tempdir().unwrap();
    hlsdeck_cmd(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "hlsdeck {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_cli_validate_defaults() {
    let dir = tempdir().unwrap();
    hlsdeck_cmd(&dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("using defaults"))
        .stdout(predicate::str::contains("http://localhost:3000"));
}

#[test]
fn test_cli_validate_config_file() {
    let dir = tempdir().unwrap();
    let config = write_config(
        dir.path(),
        r#"
[api]
base_url = "https://videos.example.com"

[catalog]
quality_labels = ["480p", "1080p"]
"#,
    );

    hlsdeck_cmd(&dir)
        .arg("validate")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("https://videos.example.com"))
        .stdout(predicate::str::contains("480p, 1080p"));
}

#[test]
fn test_cli_validate_rejects_bad_base_url() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), "[api]\nbase_url = \"ftp://nope\"\n");

    hlsdeck_cmd(&dir)
        .arg("validate")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("http://"));
}

#[test]
fn test_cli_login_then_logout() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), "# my settings\n[api]\nbase_url = \"http://localhost:3000\"\n");

    hlsdeck_cmd(&dir)
        .args(["login", "secret-token"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Token stored"));

    let content = fs::read_to_string(&config).unwrap();
    assert!(content.contains("# my settings"));
    assert!(content.contains("secret-token"));

    hlsdeck_cmd(&dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Token: configured"));

    hlsdeck_cmd(&dir).arg("logout").assert().success();
    let content = fs::read_to_string(&config).unwrap();
    assert!(!content.contains("secret-token"));
}

#[test]
fn test_cli_play_sample_headless() {
    let dir = tempdir().unwrap();
    hlsdeck_cmd(&dir)
        .args(["play", "--sample", "--headless"])
        .write_stdin("720p\nstatus\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Test video loaded successfully!"))
        .stdout(predicate::str::contains("Source: test video"))
        .stdout(predicate::str::contains("Quality: [Auto]  360p  480p  720p"))
        .stdout(predicate::str::contains("Quality: 720p"))
        .stdout(predicate::str::contains("Playing 00:00:00 [720p]"));
}

#[test]
fn test_cli_play_unknown_quality_keeps_running() {
    let dir = tempdir().unwrap();
    hlsdeck_cmd(&dir)
        .args(["play", "--sample", "--headless"])
        .write_stdin("4k\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Unknown quality: 4k"));
}

#[test]
fn test_cli_play_response_file() {
    let dir = tempdir().unwrap();
    let response = dir.path().join("response.json");
    fs::write(&response, PASTED_RESPONSE).unwrap();

    hlsdeck_cmd(&dir)
        .args(["play", "--headless", "--quality", "480p", "--response"])
        .arg(&response)
        .assert()
        .success()
        .stdout(predicate::str::contains("Response loaded successfully!"))
        .stdout(predicate::str::contains("Video ID: p"))
        .stdout(predicate::str::contains("Quality: Auto  [480p]"));
}

#[test]
fn test_cli_play_invalid_response_from_stdin() {
    let dir = tempdir().unwrap();
    hlsdeck_cmd(&dir)
        .args(["play", "--headless", "--response", "-"])
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON format"));
}

#[test]
fn test_cli_play_requires_target() {
    let dir = tempdir().unwrap();
    hlsdeck_cmd(&dir)
        .args(["play", "--headless"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to play"));
}

#[test]
fn test_cli_upload_rejects_non_video() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("notes.txt");
    fs::write(&file, "hello").unwrap();

    hlsdeck_cmd(&dir)
        .args(["--token", "t", "upload"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please select a valid video file"));
}

#[test]
fn test_cli_list_requires_sign_in() {
    let dir = tempdir().unwrap();
    hlsdeck_cmd(&dir)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please sign in to continue"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_list_and_show_against_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/videos/"))
        .and(header("authorization", "Bearer env-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "videos": [
                {"folder": "a", "url": ["a/master.m3u8", "a/a-360p.m3u8"]},
                {"folder": "b", "url": ["b/poster.jpg"]}
            ]
        })))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_config(dir.path(), &format!("[api]\nbase_url = \"{}\"\n", server.uri()));

    hlsdeck_cmd(&dir)
        .env("HLSDECK_TOKEN", "env-token")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Videos: 2"))
        .stdout(predicate::str::contains("a (auto, 360p)"))
        .stdout(predicate::str::contains("No playable stream found for b"));

    let output = hlsdeck_cmd(&dir)
        .env("HLSDECK_TOKEN", "env-token")
        .args(["show", "a", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let source: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(source["masterUrl"], "a/master.m3u8");
    assert_eq!(source["variantUrls"]["360p"], "a/a-360p.m3u8");
    assert_eq!(source["videoId"], "a");

    hlsdeck_cmd(&dir)
        .env("HLSDECK_TOKEN", "env-token")
        .args(["show", "a", "--url"])
        .assert()
        .success()
        .stdout("a/master.m3u8\n");

    hlsdeck_cmd(&dir)
        .env("HLSDECK_TOKEN", "env-token")
        .args(["show", "a", "--url", "360p"])
        .assert()
        .success()
        .stdout("a/a-360p.m3u8\n");

    hlsdeck_cmd(&dir)
        .env("HLSDECK_TOKEN", "env-token")
        .args(["show", "a", "--url", "1080p"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown quality: 1080p"));
}
