//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a matchbook command with an isolated environment.
    ///
    /// Returns a Command configured with:
    /// - HOME set to the temporary home directory
    /// - Current directory set to the test working directory
    /// - No inherited `MATCH_*` variables and the Keychain cache disabled
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("matchbook").expect("failed to find matchbook binary");
        cmd.env("HOME", self.home.path());
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("MATCHBOOK_NO_KEYCHAIN", "1");
        cmd.env("NO_COLOR", "1");
        for (key, _) in std::env::vars() {
            if key.starts_with("MATCH_") || key.starts_with("FASTLANE_") {
                cmd.env_remove(key);
            }
        }
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `matchbook init` command.
    pub fn init_cmd(&self, git_url: &str) -> Output {
        self.cmd()
            .args(["init", git_url])
            .output()
            .expect("failed to run matchbook init")
    }

    /// Shortcut for `matchbook run` with extra arguments.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .arg("run")
            .args(args)
            .output()
            .expect("failed to run matchbook run")
    }

    /// Shortcut for `matchbook encrypt` with `MATCH_PASSWORD` set.
    pub fn encrypt(&self, path: &str, password: &str) -> Output {
        self.cmd()
            .args(["encrypt", path, "--git-url", "https://example.com/certs.git"])
            .env("MATCH_PASSWORD", password)
            .output()
            .expect("failed to run matchbook encrypt")
    }

    /// Shortcut for `matchbook decrypt` with `MATCH_PASSWORD` set.
    pub fn decrypt(&self, path: &str, password: &str) -> Output {
        self.cmd()
            .args(["decrypt", path, "--git-url", "https://example.com/certs.git"])
            .env("MATCH_PASSWORD", password)
            .output()
            .expect("failed to run matchbook decrypt")
    }
}
