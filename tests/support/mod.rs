//! Test support utilities for matchbook integration tests.
//!
//! Library-level tests drive the pipeline through the fakes in [`fakes`];
//! CLI tests run the compiled binary inside a [`Test`] environment.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fakes;
pub mod fixtures;
pub mod skip;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fakes::*;
#[allow(unused_imports)]
pub use fixtures::*;

use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// Each test gets its own working dir and home dir. Child processes use
/// `.current_dir()` so tests can run in parallel.
pub struct Test {
    /// Working directory the binary runs in
    pub dir: TempDir,
    /// Temporary home directory, keeps the passphrase cache away from the real one
    pub home: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        Self { dir, home }
    }

    /// Create a test environment with `.matchbook.toml` written by `init`.
    pub fn init(git_url: &str) -> Self {
        let t = Self::new();
        let output = t.init_cmd(git_url);
        assert!(
            output.status.success(),
            "Failed to initialize: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        t
    }
}
