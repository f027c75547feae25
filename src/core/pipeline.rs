//! End-to-end store operations.
//!
//! Each operation clones the store, decrypts it once, does its work, and
//! encrypts again only when something is committed. The checkout is removed
//! afterwards whether or not the operation succeeded.

use std::path::Path;

use tracing::info;

use crate::core::cipher::{Cipher, CipherStore, Direction};
use crate::core::commit::{generate_commit_message, Committer};
use crate::core::config::Config;
use crate::core::constants;
use crate::core::domain::{CommitOutcome, Reconciliation, RunReport};
use crate::core::generator::Generator;
use crate::core::git::Vcs;
use crate::core::installer::Installer;
use crate::core::manual::{self, ManualImport};
use crate::core::passphrase::{Passphrases, StoreIdentity};
use crate::core::portal::Portal;
use crate::core::runner::Runner;
use crate::error::{ConfigError, Result};

/// The external pieces an operation works with.
pub struct Collaborators<'a> {
    pub vcs: &'a dyn Vcs,
    pub cipher: &'a dyn Cipher,
    pub generator: &'a dyn Generator,
    pub installer: &'a dyn Installer,
    pub portal: Option<&'a dyn Portal>,
    pub passphrases: &'a Passphrases,
}

/// Fetch, reconcile and install everything the configuration asks for.
///
/// # Errors
///
/// Returns configuration, passphrase, reconciliation, or tool errors. Nothing
/// is committed when an error occurs.
pub fn run(config: &Config, collab: &Collaborators<'_>) -> Result<RunReport> {
    run_tracked(config, collab, &mut Vec::new())
}

/// [`run`], recording each credential kind's result in `progress` as soon as
/// reconciliation has settled it. After a reconciliation error, the kind that
/// failed is the last entry.
///
/// # Errors
///
/// Same as [`run`].
pub fn run_tracked(
    config: &Config,
    collab: &Collaborators<'_>,
    progress: &mut Vec<Reconciliation>,
) -> Result<RunReport> {
    config.validate()?;
    with_checkout(config, collab.vcs, collab.cipher, |workspace, store, identity| {
        store.decrypt(workspace, identity, collab.passphrases)?;

        let mut runner = Runner::new(config, workspace, collab.generator, collab.installer)
            .with_portal(collab.portal);
        let reconciled = runner.reconcile();
        progress.extend_from_slice(runner.reconciliations());
        let reconciled = reconciled?;

        let commit = Committer::new(collab.vcs, config).commit(
            workspace,
            reconciled.dirty,
            config.readonly,
            |ws| encrypt(store, ws, identity, collab.passphrases),
            || generate_commit_message(config),
        )?;

        info!("all required keys, certificates and provisioning profiles are installed");
        Ok(reconciled.into_report(config, commit))
    })
}

/// Put existing certificates and profiles into the store.
///
/// # Errors
///
/// Returns `ConfigError::Manual` for an invalid file combination, checked
/// before the store is cloned.
pub fn import(config: &Config, collab: &Collaborators<'_>, files: &ManualImport) -> Result<RunReport> {
    config.validate()?;
    files.validate()?;
    with_checkout(config, collab.vcs, collab.cipher, |workspace, store, identity| {
        store.decrypt(workspace, identity, collab.passphrases)?;

        let imported = manual::import(config, workspace, files)?;

        let commit = Committer::new(collab.vcs, config).commit(
            workspace,
            imported.dirty,
            config.readonly,
            |ws| encrypt(store, ws, identity, collab.passphrases),
            || generate_commit_message(config),
        )?;

        info!("given keys, certificates and provisioning profiles have been put in the store");
        Ok(imported.into_report(config, commit))
    })
}

/// Re-encrypt the whole store with a new passphrase.
///
/// The store is decrypted with the current passphrase, a new one is asked
/// for, and only after the re-encrypted store has been committed is the new
/// passphrase cached.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for read-only runs and
/// `PassphraseError::Blank` for a blank new passphrase.
pub fn change_passphrase(
    config: &Config,
    vcs: &dyn Vcs,
    cipher: &dyn Cipher,
    passphrases: &Passphrases,
) -> Result<CommitOutcome> {
    if config.git_url.trim().is_empty() {
        return Err(ConfigError::MissingField { field: "git_url" }.into());
    }
    if config.readonly {
        return Err(ConfigError::InvalidValue {
            field: "readonly",
            reason: "the passphrase of a store can't be changed in readonly mode".to_string(),
        }
        .into());
    }

    with_checkout(config, vcs, cipher, |workspace, store, identity| {
        store.decrypt(workspace, identity, passphrases)?;

        let new = passphrases.ask_new()?;
        let commit = Committer::new(vcs, config).commit(
            workspace,
            true,
            false,
            |ws| store.transform(ws, &new, Direction::Encrypt).map(|_| ()),
            || format!("[{}] Changed passphrase", constants::COMMIT_TAG),
        )?;

        if let CommitOutcome::Committed { .. } = commit {
            passphrases.store(identity, &new)?;
            info!("successfully changed the passphrase");
        }
        Ok(commit)
    })
}

fn with_checkout<'c, T>(
    config: &Config,
    vcs: &dyn Vcs,
    cipher: &'c dyn Cipher,
    work: impl FnOnce(&Path, &CipherStore<&'c dyn Cipher>, &StoreIdentity) -> Result<T>,
) -> Result<T> {
    let identity = StoreIdentity::from_remote(&config.git_url);
    let store = CipherStore::new(cipher);
    let checkout = vcs.clone_repo(&config.git_url, &config.git_branch, config.shallow_clone)?;

    let result = work(checkout.path(), &store, &identity);
    checkout.clear();
    result
}

fn encrypt(
    store: &CipherStore<&dyn Cipher>,
    workspace: &Path,
    identity: &StoreIdentity,
    passphrases: &Passphrases,
) -> Result<()> {
    store.encrypt(workspace, identity, passphrases).map(|_| ())
}
