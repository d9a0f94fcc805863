//! CLI end-to-end tests
//!
//! Tests for the mpdforge command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the mpdforge binary
#[allow(deprecated)]
fn mpdforge_cmd() -> Command {
    Command::cargo_bin("mpdforge").unwrap()
}

const AUDIO_DESCRIPTOR: &str = r#"{
    "id": 140,
    "kind": "audio",
    "codec": "mp4a.40.2",
    "mime_type": "audio/mp4",
    "bitrate": 130000,
    "sample_rate": 44100,
    "audio_channels": 2,
    "language": "en",
    "track_type": "dubbed",
    "index_start": 741,
    "index_end": 1204,
    "init_start": 0,
    "init_end": 740,
    "approx_duration_ms": 240000
}"#;

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = mpdforge_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = mpdforge_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("mpdforge"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = mpdforge_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_generate_help() {
    let mut cmd = mpdforge_cmd();
    cmd.args(["generate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generate a DASH manifest"))
        .stdout(predicate::str::contains("--descriptor"));
}

#[test]
fn test_cli_generate_progressive_to_stdout() {
    let dir = tempdir().unwrap();
    let descriptor = dir.path().join("audio.json");
    fs::write(&descriptor, AUDIO_DESCRIPTOR).unwrap();

    let mut cmd = mpdforge_cmd();
    cmd.current_dir(dir.path())
        .args(["generate", "https://cdn.example/audio.m4a?id=1&itag=140"])
        .args(["--delivery", "progressive", "--descriptor"])
        .arg(&descriptor)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<?xml"))
        .stdout(predicate::str::contains(
            "<BaseURL>https://cdn.example/audio.m4a?id=1&amp;itag=140</BaseURL>",
        ))
        .stdout(predicate::str::contains(r#"lang="en""#))
        .stdout(predicate::str::contains(r#"value="dub""#))
        .stdout(predicate::str::contains(r#"mediaPresentationDuration="PT240.000S""#));
}

#[test]
fn test_cli_generate_writes_output_file() {
    let dir = tempdir().unwrap();
    let descriptor = dir.path().join("audio.json");
    let output = dir.path().join("manifest.mpd");
    fs::write(&descriptor, AUDIO_DESCRIPTOR).unwrap();

    let mut cmd = mpdforge_cmd();
    cmd.current_dir(dir.path())
        .args(["generate", "https://cdn.example/audio.m4a", "-d", "progressive"])
        .arg("--descriptor")
        .arg(&descriptor)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let manifest = fs::read_to_string(&output).unwrap();
    assert!(manifest.contains(r#"<Initialization range="0-740"/>"#));
}

#[test]
fn test_cli_generate_reports_creation_errors() {
    let dir = tempdir().unwrap();
    let descriptor = dir.path().join("audio.json");
    let unknown_duration = AUDIO_DESCRIPTOR.replace("240000", "-1");
    fs::write(&descriptor, unknown_duration).unwrap();

    let mut cmd = mpdforge_cmd();
    cmd.current_dir(dir.path())
        .args(["generate", "https://cdn.example/audio.m4a", "-d", "progressive"])
        .arg("--descriptor")
        .arg(&descriptor)
        .args(["--fallback-duration", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to generate progressive manifest"));
}

#[test]
fn test_cli_generate_live_requires_target_duration() {
    let dir = tempdir().unwrap();
    let descriptor = dir.path().join("audio.json");
    fs::write(&descriptor, AUDIO_DESCRIPTOR).unwrap();

    let mut cmd = mpdforge_cmd();
    cmd.current_dir(dir.path())
        .args(["generate", "http://127.0.0.1:9/videoplayback?id=1", "-d", "live"])
        .arg("--descriptor")
        .arg(&descriptor)
        .assert()
        .failure()
        .stderr(predicate::str::contains("targetDurationSec"));
}

#[test]
fn test_cli_generate_rejects_unknown_delivery() {
    let mut cmd = mpdforge_cmd();
    cmd.args(["generate", "https://cdn.example/a", "-d", "hls", "--descriptor", "x.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown delivery type"));
}

#[test]
fn test_cli_generate_missing_descriptor_file() {
    let dir = tempdir().unwrap();
    let mut cmd = mpdforge_cmd();
    cmd.current_dir(dir.path())
        .args(["generate", "https://cdn.example/a", "-d", "otf"])
        .args(["--descriptor", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read descriptor file"));
}

#[test]
fn test_cli_validate_valid_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
[http]
timeout_secs = 15

[cache]
max_entries = 500
clear_factor = 0.5
"#,
    )
    .unwrap();

    let mut cmd = mpdforge_cmd();
    cmd.arg("validate")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("500 entries"));
}

#[test]
fn test_cli_validate_invalid_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[cache]\nclear_factor = 1.5\n").unwrap();

    let mut cmd = mpdforge_cmd();
    cmd.arg("validate")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("clear_factor"));
}

#[test]
fn test_cli_validate_uses_global_config_flag() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("custom.toml");
    fs::write(&config_path, "[clients]\ncountry_code = \"DE\"\n").unwrap();

    let mut cmd = mpdforge_cmd();
    cmd.arg("--config")
        .arg(&config_path)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Client country: DE"));
}

#[test]
fn test_cli_validate_defaults() {
    let dir = tempdir().unwrap();
    let mut cmd = mpdforge_cmd();
    cmd.current_dir(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("using defaults"))
        .stdout(predicate::str::contains("unbounded"));
}
