//! Tests for `matchbook init`.

use crate::support::*;
use std::fs;

#[test]
fn test_init_writes_config() {
    let t = Test::new();

    let output = t
        .cmd()
        .args([
            "init",
            "git@github.com:fastlane/certificates.git",
            "--type",
            "appstore",
            "-a",
            "tools.fastlane.app",
        ])
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, ".matchbook.toml");

    let config = fs::read_to_string(t.dir.path().join(".matchbook.toml")).unwrap();
    assert!(config.contains("git_url = \"git@github.com:fastlane/certificates.git\""));
    assert!(config.contains("type = \"appstore\""));
    assert!(config.contains("app_identifier = \"tools.fastlane.app\""));
    assert!(!config.contains("password"));
}

#[test]
fn test_init_twice_fails() {
    let t = Test::init("https://example.com/certs.git");

    let output = t.init_cmd("https://example.com/other.git");
    assert_failure(&output);
    assert_stderr_contains(&output, "already exists");

    let config = fs::read_to_string(t.dir.path().join(".matchbook.toml")).unwrap();
    assert!(config.contains("https://example.com/certs.git"));
}

#[test]
fn test_init_rejects_unknown_type() {
    let t = Test::new();

    let output = t
        .cmd()
        .args(["init", "https://example.com/certs.git", "--type", "beta"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "unsupported environment beta");
    assert!(!t.dir.path().join(".matchbook.toml").exists());
}
