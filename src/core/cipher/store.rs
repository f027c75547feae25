//! Whole-directory encryption and decryption.
//!
//! A transform is staged: every recognized file is transformed into a hidden
//! temporary file next to it, and only when all of them succeeded are the
//! temporaries renamed over the originals. Each original is kept aside until
//! every rename went through and is put back if one of them fails, so a
//! failure anywhere leaves the working directory as it was.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tracing::{debug, error, info};

use super::{Cipher, Direction};
use crate::core::constants;
use crate::core::domain::{Passphrase, PassphraseSource};
use crate::core::passphrase::{Passphrases, StoreIdentity};
use crate::error::{CipherError, Error, PassphraseError, Result};

/// Decrypt attempts. There are exactly two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    First,
    Retry,
}

/// Applies a [`Cipher`] to every credential file of a store checkout.
#[derive(Debug, Clone)]
pub struct CipherStore<C> {
    cipher: C,
}

impl<C: Cipher> CipherStore<C> {
    pub fn new(cipher: C) -> Self {
        Self { cipher }
    }

    /// All recognized credential files under `root`, in directory-listing
    /// order. Hidden files and directories (including `.git`) are skipped.
    ///
    /// # Errors
    ///
    /// Returns an IO error if a directory cannot be listed.
    pub fn files(root: &Path) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        collect(root, &mut found)?;
        Ok(found)
    }

    /// Transform every credential file under `root` in place.
    ///
    /// # Returns
    ///
    /// The number of files transformed.
    ///
    /// # Errors
    ///
    /// Returns `PassphraseError::Blank` for an encrypt with a blank
    /// passphrase, before any file is touched. Otherwise returns the first
    /// cipher error; no file is modified in that case.
    pub fn transform(&self, root: &Path, passphrase: &Passphrase, direction: Direction) -> Result<usize> {
        if direction == Direction::Encrypt && passphrase.is_blank() {
            return Err(PassphraseError::Blank.into());
        }

        let files = Self::files(root)?;
        let mut staged: Vec<(TempPath, &Path)> = Vec::with_capacity(files.len());

        for path in &files {
            let dir = path.parent().unwrap_or(root);
            let tmp = tempfile::Builder::new()
                .prefix(".matchbook-")
                .tempfile_in(dir)?
                .into_temp_path();

            self.cipher.transform(path, &tmp, passphrase, direction)?;
            debug!(file = %display_name(path), %direction, "staged");
            staged.push((tmp, path.as_path()));
        }

        replace_all(staged)?;
        Ok(files.len())
    }

    /// Encrypt a store checkout with its passphrase.
    ///
    /// # Errors
    ///
    /// Returns `PassphraseError::Blank` if the resolved passphrase is blank.
    pub fn encrypt(&self, root: &Path, identity: &StoreIdentity, passphrases: &Passphrases) -> Result<usize> {
        let passphrase = passphrases.resolve(identity)?;
        let count = self.transform(root, &passphrase, Direction::Encrypt)?;
        info!(files = count, cipher = self.cipher.name(), "encrypted certificates repo");
        Ok(count)
    }

    /// Decrypt a store checkout, re-asking once for the passphrase if the
    /// stored one is rejected. An empty store needs no passphrase.
    ///
    /// A rejected cached or typed passphrase is removed from the cache and
    /// the whole decrypt is tried again with a freshly resolved one. A second
    /// rejection is fatal. A rejected `MATCH_PASSWORD` is fatal immediately,
    /// since there is nothing to re-ask.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::InvalidOverride` or
    /// `CipherError::PassphraseRejected` for rejected passphrases, and any
    /// other error unchanged.
    pub fn decrypt(&self, root: &Path, identity: &StoreIdentity, passphrases: &Passphrases) -> Result<usize> {
        if Self::files(root)?.is_empty() {
            debug!("no encrypted files in the store");
            return Ok(0);
        }

        let mut attempt = Attempt::First;

        loop {
            let passphrase = passphrases.resolve(identity)?;

            let path = match self.transform(root, &passphrase, Direction::Decrypt) {
                Ok(count) => {
                    info!(files = count, cipher = self.cipher.name(), "decrypted certificates repo");
                    return Ok(count);
                }
                Err(Error::Cipher(CipherError::WrongPassphrase { path })) => path,
                Err(e) => return Err(e),
            };

            error!(
                file = %display_name(&path),
                "couldn't decrypt the repo, please make sure you enter the right passphrase"
            );

            if passphrase.source() == PassphraseSource::Override {
                return Err(CipherError::InvalidOverride.into());
            }

            passphrases.invalidate(identity)?;

            attempt = match attempt {
                Attempt::First => Attempt::Retry,
                Attempt::Retry => return Err(CipherError::PassphraseRejected.into()),
            };
        }
    }
}

/// Move every staged file over its target. After a failed move, targets that
/// were already replaced get their original content back.
fn replace_all(staged: Vec<(TempPath, &Path)>) -> Result<()> {
    let mut originals: Vec<(TempPath, &Path)> = Vec::with_capacity(staged.len());

    for (tmp, path) in staged {
        match swap(tmp, path) {
            Ok(original) => originals.push((original, path)),
            Err(e) => {
                for (original, path) in originals.into_iter().rev() {
                    if let Err(restore) = original.persist(path) {
                        error!(file = %display_name(path), error = %restore.error, "couldn't restore original");
                    }
                }
                return Err(e);
            }
        }
    }

    // Dropping the originals deletes them.
    Ok(())
}

/// Replace `path` with `staged`, returning the original as a hidden temporary.
fn swap(staged: TempPath, path: &Path) -> Result<TempPath> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let original = tempfile::Builder::new()
        .prefix(".matchbook-")
        .tempfile_in(dir)?
        .into_temp_path();
    fs::rename(path, &original)?;

    match staged.persist(path) {
        Ok(()) => Ok(original),
        Err(e) => {
            original.persist(path).map_err(|restore| restore.error)?;
            Err(e.error.into())
        }
    }
}

fn collect(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect(&path, found)?;
        } else if file_type.is_file() && is_recognized(&path) {
            found.push(path);
        }
    }
    Ok(())
}

fn is_recognized(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| constants::ENCRYPTED_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
