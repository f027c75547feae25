//! Error reporting and hints.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let t = Test::new();

    let assert = t.cmd().arg("--help").assert().success();
    let help = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    for command in ["run", "import", "encrypt", "decrypt", "passphrase", "init"] {
        assert!(predicate::str::contains(command).eval(&help), "help misses {}", command);
    }
}

#[test]
fn test_run_without_git_url() {
    let t = Test::new();

    let output = t.run(&["--type", "appstore", "-a", "tools.fastlane.app"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "missing required option: git_url");
    assert_stderr_contains(&output, "matchbook init");
}

#[test]
fn test_run_without_app_identifier() {
    let t = Test::init("https://example.com/certs.git");

    let output = t.run(&["--type", "appstore"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "app_identifier");
}

#[test]
fn test_android_type_without_android() {
    let t = Test::init("https://example.com/certs.git");

    let output = t.run(&["--type", "release", "-a", "tools.fastlane.app"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "only available together with android");
}

#[test]
fn test_import_needs_cert_and_key_together() {
    let t = Test::init("https://example.com/certs.git");
    std::fs::write(t.dir.path().join("a.cer"), CERT).unwrap();

    let output = t
        .cmd()
        .args(["import", "-a", "tools.fastlane.app", "--cert", "a.cer"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "together");
}

#[test]
fn test_forget_without_cached_passphrase() {
    let t = Test::init("https://example.com/certs.git");

    let output = t.cmd().args(["passphrase", "forget"]).output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "match_https://example.com/certs.git");
}

#[test]
fn test_completions() {
    let t = Test::new();

    t.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_matchbook"));
}
