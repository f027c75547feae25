//! Creating new signing artifacts.
//!
//! The [`Generator`] trait is the seam to whatever actually talks to the
//! developer portal or produces keys. Each method writes exactly one new
//! artifact into `output_dir` and returns its path; the reconciliation
//! engine takes care of where that directory is and what happens next.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use crate::core::config::Config;
use crate::core::constants;
use crate::core::domain::{CertType, CredentialKind, KeyType, ProfileType};
use crate::error::{GenerationError, Result};

mod fastlane;

pub use fastlane::Fastlane;

/// Text the portal returns when no more certificates can be issued.
const ACCOUNT_LIMIT_MARKER: &str = "You already have a current";

/// Produces new artifacts.
pub trait Generator {
    /// Request a new signing certificate and its private key.
    ///
    /// Returns the path of the `.cer`; the `.p12` lands next to it with the
    /// same stem.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::AccountLimit` when the account cannot hold
    /// another certificate.
    fn certificate(&self, config: &Config, cert_type: CertType, output_dir: &Path) -> Result<PathBuf>;

    /// Request a new provisioning profile bound to `certificate_id`.
    fn profile(
        &self,
        config: &Config,
        profile_type: ProfileType,
        certificate_id: &str,
        output_dir: &Path,
    ) -> Result<PathBuf>;

    /// Create a new Android keystore.
    fn keystore(&self, config: &Config, key_type: KeyType, output_dir: &Path) -> Result<PathBuf>;

    /// Store a new supply (Play Store API) key.
    fn supply_key(&self, config: &Config, key_type: KeyType, output_dir: &Path) -> Result<PathBuf>;
}

impl<G: Generator + ?Sized> Generator for &G {
    fn certificate(&self, config: &Config, cert_type: CertType, output_dir: &Path) -> Result<PathBuf> {
        (**self).certificate(config, cert_type, output_dir)
    }

    fn profile(
        &self,
        config: &Config,
        profile_type: ProfileType,
        certificate_id: &str,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        (**self).profile(config, profile_type, certificate_id, output_dir)
    }

    fn keystore(&self, config: &Config, key_type: KeyType, output_dir: &Path) -> Result<PathBuf> {
        (**self).keystore(config, key_type, output_dir)
    }

    fn supply_key(&self, config: &Config, key_type: KeyType, output_dir: &Path) -> Result<PathBuf> {
        (**self).supply_key(config, key_type, output_dir)
    }
}

/// Portal-side name of a generated profile, e.g.
/// `match AppStore tools.fastlane.app ios`.
pub fn profile_name(profile_type: ProfileType, app_identifier: &str, config: &Config) -> String {
    format!(
        "match {} {} {}",
        profile_type.type_name(),
        app_identifier,
        config.platform
    )
}

/// Turn a generation failure message into an error, recognizing the
/// account-level certificate limit.
pub fn classify_failure(kind: CredentialKind, message: String) -> GenerationError {
    if message.contains(ACCOUNT_LIMIT_MARKER) {
        GenerationError::AccountLimit
    } else {
        GenerationError::Failed { kind, message }
    }
}

/// Delete every `*.certSigningRequest` left under `root`.
///
/// # Returns
///
/// The number of files removed.
///
/// # Errors
///
/// Returns an IO error if a directory cannot be listed or a file removed.
pub fn remove_signing_requests(root: &Path) -> Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            removed += remove_signing_requests(&path)?;
        } else if path.extension().and_then(|e| e.to_str())
            == Some(constants::SIGNING_REQUEST_EXTENSION)
        {
            fs::remove_file(&path)?;
            debug!(path = %path.display(), "removed signing request");
            removed += 1;
        }
    }
    Ok(removed)
}

/// Random upper-case hex file stem for artifacts whose name carries no
/// meaning.
pub fn random_stem() -> String {
    Uuid::new_v4().simple().to_string().to_uppercase()
}
