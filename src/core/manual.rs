//! Importing existing signing material into a store by hand.
//!
//! Used when certificates or profiles were created outside matchbook. A
//! certificate always comes with its private key; importing one replaces
//! whatever identity the store held for that sub-type.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::config::Config;
use crate::core::constants;
use crate::core::domain::{ArtifactKind, CredentialKind, ProvisioningProfile, Reconciliation};
use crate::core::generator;
use crate::core::locator;
use crate::core::runner::Reconciled;
use crate::error::{ConfigError, Result};

/// Files to import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualImport {
    pub cert: Option<PathBuf>,
    pub p12: Option<PathBuf>,
    pub profile: Option<PathBuf>,
}

impl ManualImport {
    /// Check the combination of files before anything is cloned.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Manual` unless a cert and p12 pair, a profile, or
    /// both are given, and every given file exists.
    pub fn validate(&self) -> Result<()> {
        if self.profile.is_none() && self.cert.is_none() && self.p12.is_none() {
            return Err(ConfigError::Manual(
                "supply a provisioning profile, or a cert and p12 pair".to_string(),
            )
            .into());
        }
        if self.cert.is_some() != self.p12.is_some() {
            return Err(ConfigError::Manual(
                "the cert and p12 options must be given together".to_string(),
            )
            .into());
        }
        for path in [&self.cert, &self.p12, &self.profile].into_iter().flatten() {
            if !path.is_file() {
                return Err(
                    ConfigError::Manual(format!("'{}' is not a file", path.display())).into(),
                );
            }
        }
        Ok(())
    }
}

/// Copy the given files into a decrypted store checkout.
///
/// # Errors
///
/// Returns a validation error, an invalid profile error, or an IO error.
pub fn import(config: &Config, workspace: &Path, files: &ManualImport) -> Result<Reconciled> {
    files.validate()?;

    let mut reconciliations = Vec::new();
    let mut profile_uuid = None;

    if let Some(profile) = &files.profile {
        let (stored, uuid) = save_profile(config, workspace, profile)?;
        let subtype = config.profile_type()?.as_str();
        reconciliations.push(Reconciliation::generated(CredentialKind::Profile, subtype, stored));
        profile_uuid = Some(uuid);
    }

    if let (Some(cert), Some(p12)) = (&files.cert, &files.p12) {
        let stored = save_certificate(config, workspace, cert, p12)?;
        let subtype = config.cert_type().as_str();
        reconciliations
            .push(Reconciliation::generated(CredentialKind::Certificate, subtype, stored));
    }

    let dirty = !reconciliations.is_empty();
    if dirty {
        fs::write(workspace.join(constants::MANUAL_MARK_FILE), b"")?;
    }

    Ok(Reconciled {
        dirty,
        profile_uuid,
        reconciliations,
        exported: Vec::new(),
    })
}

fn save_profile(config: &Config, workspace: &Path, source: &Path) -> Result<(PathBuf, String)> {
    let profile_type = config.profile_type()?;
    let app = config.app_identifier()?;
    let parsed = ProvisioningProfile::load(source)?;

    let dir = locator::directory(workspace, ArtifactKind::Profile, profile_type.as_str());
    fs::create_dir_all(&dir)?;
    let stored = dir.join(format!(
        "{}.{}",
        profile_type.file_stem(app),
        ArtifactKind::Profile.extension()
    ));

    debug!(from = %source.display(), to = %stored.display(), "saving profile");
    fs::copy(source, &stored)?;
    info!(uuid = %parsed.uuid, "saved provisioning profile");
    Ok((stored, parsed.uuid))
}

fn save_certificate(config: &Config, workspace: &Path, cert: &Path, p12: &Path) -> Result<PathBuf> {
    let subtype = config.cert_type().as_str();

    for kind in [ArtifactKind::Certificate, ArtifactKind::PrivateKey] {
        for old in locator::find(workspace, kind, subtype, None) {
            fs::remove_file(&old)?;
            warn!(file = %old.display(), "removed stored identity");
        }
    }

    let dir = locator::directory(workspace, ArtifactKind::Certificate, subtype);
    fs::create_dir_all(&dir)?;
    let stem = generator::random_stem();
    let cert_path = dir.join(format!("{}.{}", stem, ArtifactKind::Certificate.extension()));
    let key_path = dir.join(format!("{}.{}", stem, ArtifactKind::PrivateKey.extension()));

    fs::copy(cert, &cert_path)?;
    fs::copy(p12, &key_path)?;
    info!(certificate = %stem, "saved certificate and private key");
    Ok(cert_path)
}
