//! Store repository access.
//!
//! A store is cloned into a fresh temporary directory for every run and
//! removed again when the [`Checkout`] is dropped, so nothing decrypted
//! outlives the process.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use tracing::{debug, info};

use crate::core::tool;
use crate::error::{Result, ToolError};

/// A local working copy of a store.
#[derive(Debug)]
pub struct Checkout {
    path: PathBuf,
    temp: Option<TempDir>,
}

impl Checkout {
    /// A checkout that owns its temporary directory.
    pub fn temporary(dir: TempDir) -> Self {
        Self {
            path: dir.path().to_path_buf(),
            temp: Some(dir),
        }
    }

    /// A checkout of an existing directory that is left alone on drop.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            temp: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Throw away the working copy and everything in it.
    pub fn clear(self) {
        if let Some(dir) = self.temp {
            let path = dir.path().to_path_buf();
            match dir.close() {
                Ok(()) => debug!(path = %path.display(), "removed checkout"),
                Err(e) => debug!(path = %path.display(), error = %e, "failed to remove checkout"),
            }
        }
    }
}

/// Version control operations on a store.
pub trait Vcs {
    /// Clone `branch` of `remote` into a new checkout.
    fn clone_repo(&self, remote: &str, branch: &str, shallow: bool) -> Result<Checkout>;

    /// Record every change in `workspace` with `message` and publish it.
    ///
    /// Returns `false` when the workspace had nothing to record.
    fn commit(&self, workspace: &Path, message: &str, remote: &str, branch: &str) -> Result<bool>;
}

impl<V: Vcs + ?Sized> Vcs for &V {
    fn clone_repo(&self, remote: &str, branch: &str, shallow: bool) -> Result<Checkout> {
        (**self).clone_repo(remote, branch, shallow)
    }

    fn commit(&self, workspace: &Path, message: &str, remote: &str, branch: &str) -> Result<bool> {
        (**self).commit(workspace, message, remote, branch)
    }
}

/// The git CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct Git;

impl Git {
    /// Check if git is available
    pub fn check() -> Result<()> {
        if tool::available("git") {
            Ok(())
        } else {
            Err(ToolError::NotFound("git").into())
        }
    }
}

impl Vcs for Git {
    fn clone_repo(&self, remote: &str, branch: &str, shallow: bool) -> Result<Checkout> {
        let dir = tempfile::Builder::new().prefix("matchbook").tempdir()?;

        info!(remote, branch, shallow, "cloning store");
        let mut cmd = Command::new("git");
        cmd.args(clone_args(remote, branch, dir.path(), shallow));
        tool::run("git", &mut cmd)?;

        Ok(Checkout::temporary(dir))
    }

    fn commit(&self, workspace: &Path, message: &str, remote: &str, branch: &str) -> Result<bool> {
        let status = git_output(workspace, &["status", "--porcelain"])?;
        if status.trim().is_empty() {
            debug!("nothing to commit");
            return Ok(false);
        }

        git_output(workspace, &["add", "-A"])?;
        git_output(workspace, &["commit", "-m", message])?;
        git_output(workspace, &["push", "origin", branch])?;

        info!(remote, branch, message, "pushed changes to store");
        Ok(true)
    }
}

/// Arguments of the clone command, e.g.
/// `clone <remote> -b <branch> <path> --depth 1`.
pub fn clone_args(remote: &str, branch: &str, path: &Path, shallow: bool) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "clone".into(),
        remote.into(),
        "-b".into(),
        branch.into(),
        path.as_os_str().to_owned(),
    ];
    if shallow {
        args.push("--depth".into());
        args.push("1".into());
    }
    args
}

fn git_output(dir: &Path, args: &[&str]) -> Result<String> {
    let mut cmd = Command::new("git");
    cmd.arg("-C").arg(dir).args(args);
    tool::run("git", &mut cmd)
}
