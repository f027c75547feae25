//! Encrypt and decrypt commands.
//!
//! Work on a checkout the user already has, e.g. to inspect or repair a
//! store by hand.

use std::path::Path;

use crate::cli::{load_config, output, prompt};
use crate::core::cipher::{CipherStore, OpenSsl};
use crate::core::passphrase::StoreIdentity;
use crate::error::{ConfigError, Result};

/// Encrypt a local checkout.
pub fn encrypt(path: &Path, git_url: Option<String>, verbose: bool) -> Result<()> {
    let identity = identity(git_url, verbose)?;
    OpenSsl::check()?;

    let count = CipherStore::new(OpenSsl).encrypt(path, &identity, &prompt::passphrases())?;
    output::success(&format!(
        "encrypted {} files in {}",
        count,
        output::path(path.display())
    ));
    Ok(())
}

/// Decrypt a local checkout.
pub fn decrypt(path: &Path, git_url: Option<String>, verbose: bool) -> Result<()> {
    let identity = identity(git_url, verbose)?;
    OpenSsl::check()?;

    let count = CipherStore::new(OpenSsl).decrypt(path, &identity, &prompt::passphrases())?;
    output::success(&format!(
        "decrypted {} files in {}",
        count,
        output::path(path.display())
    ));
    output::warn("decrypted files are not protected, encrypt them again before committing");
    Ok(())
}

/// Store identity from the flag, falling back to `.matchbook.toml`.
pub(crate) fn identity(git_url: Option<String>, verbose: bool) -> Result<StoreIdentity> {
    let git_url = match git_url {
        Some(url) => url,
        None => load_config(verbose)?.git_url,
    };
    if git_url.trim().is_empty() {
        return Err(ConfigError::MissingField { field: "git_url" }.into());
    }
    Ok(StoreIdentity::from_remote(&git_url))
}
