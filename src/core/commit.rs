//! Writing changes back to the store.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::core::config::Config;
use crate::core::constants;
use crate::core::domain::CommitOutcome;
use crate::core::git::Vcs;
use crate::error::Result;

/// Commit message for a run, e.g.
/// `[fastlane] Updated tools.fastlane.app for appstore`.
pub fn generate_commit_message(config: &Config) -> String {
    match config.app_identifier.as_deref() {
        Some(app) => format!(
            "[{}] Updated {} for {}",
            constants::COMMIT_TAG,
            app,
            config.environment
        ),
        None => format!("[{}] Updated {}", constants::COMMIT_TAG, config.environment),
    }
}

/// Commits accumulated store changes through a [`Vcs`].
pub struct Committer<V> {
    vcs: V,
    remote: String,
    branch: String,
}

impl<V: Vcs> Committer<V> {
    pub fn new(vcs: V, config: &Config) -> Self {
        Self {
            vcs,
            remote: config.git_url.clone(),
            branch: config.git_branch.clone(),
        }
    }

    /// Commit the workspace if it is dirty and writes are allowed.
    ///
    /// Before committing, the version marker is written and `prepare` runs
    /// on the workspace (this is where the store gets encrypted). Neither
    /// happens when the commit is skipped.
    ///
    /// # Errors
    ///
    /// Returns whatever `prepare` or the VCS reports.
    pub fn commit<P, M>(
        &self,
        workspace: &Path,
        dirty: bool,
        readonly: bool,
        prepare: P,
        message: M,
    ) -> Result<CommitOutcome>
    where
        P: FnOnce(&Path) -> Result<()>,
        M: FnOnce() -> String,
    {
        if !dirty {
            debug!("store unchanged, nothing to commit");
            return Ok(CommitOutcome::SkippedNoChanges);
        }
        if readonly {
            info!("store changed but readonly is enabled, not committing");
            return Ok(CommitOutcome::SkippedReadOnly);
        }

        write_version_marker(workspace)?;
        prepare(workspace)?;

        let message = message();
        if !self
            .vcs
            .commit(workspace, &message, &self.remote, &self.branch)?
        {
            warn!("store was marked as changed but the checkout has no changes, nothing pushed");
            return Ok(CommitOutcome::SkippedNoChanges);
        }
        info!(message = %message, "committed store changes");
        Ok(CommitOutcome::Committed { message })
    }
}

/// Record the tool version that last wrote the store.
fn write_version_marker(workspace: &Path) -> Result<()> {
    let path = workspace.join(constants::VERSION_FILE);
    fs::write(&path, env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
