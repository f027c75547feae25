//! Test assertion helpers.

use std::path::Path;
use std::process::Output;

use matchbook::core::domain::{CredentialKind, RunReport, State};

/// Assert that a command output was successful.
pub fn assert_success(output: &Output) {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("Command failed:\n{}", stderr);
    }
}

/// Assert that a command output failed.
pub fn assert_failure(output: &Output) {
    assert!(
        !output.status.success(),
        "Expected command to fail but it succeeded"
    );
}

/// Get stdout as String.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Get stderr as String.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Assert stdout contains a string.
pub fn assert_stdout_contains(output: &Output, expected: &str) {
    let out = stdout(output);
    assert!(
        out.contains(expected),
        "stdout missing '{}', got: {}",
        expected,
        out
    );
}

/// Assert stderr contains a string.
pub fn assert_stderr_contains(output: &Output, expected: &str) {
    let err = stderr(output);
    assert!(
        err.contains(expected),
        "stderr missing '{}', got: {}",
        expected,
        err
    );
}

/// Assert the state a credential kind ended up in.
pub fn assert_state(report: &RunReport, kind: CredentialKind, expected: State) {
    let found = report
        .reconciliations
        .iter()
        .find(|r| r.kind == kind)
        .unwrap_or_else(|| panic!("no reconciliation for {}", kind));
    assert_eq!(
        found.state, expected,
        "{} ended up {}, expected {}",
        kind, found.state, expected
    );
}

/// Assert a file exists and has exactly `content`.
pub fn assert_file(path: &Path, content: &[u8]) {
    let actual = std::fs::read(path)
        .unwrap_or_else(|e| panic!("couldn't read {}: {}", path.display(), e));
    assert_eq!(
        actual,
        content,
        "unexpected content in {}: {}",
        path.display(),
        String::from_utf8_lossy(&actual)
    );
}
