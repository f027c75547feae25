//! The reconciliation engine.
//!
//! For every credential kind a run needs, the [`Runner`] decides between
//! reusing what the decrypted store already holds and generating something
//! new. Reuse installs the artifact locally; generation writes into the store
//! and marks it dirty so the caller commits afterwards. Read-only runs fail
//! instead of generating.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::core::config::Config;
use crate::core::domain::{
    ArtifactKind, CommitOutcome, CredentialKind, ProvisioningProfile, Reconciliation, RunReport,
};
use crate::core::generator::{self, Generator};
use crate::core::installer::Installer;
use crate::core::locator;
use crate::core::portal::Portal;
use crate::core::types::{CertificateId, ProfileUuid};
use crate::error::{ConfigError, ReconcileError, Result};

/// What reconciliation left behind, before anything is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// Whether the store was written to.
    pub dirty: bool,
    pub profile_uuid: Option<ProfileUuid>,
    pub reconciliations: Vec<Reconciliation>,
    pub exported: Vec<PathBuf>,
}

impl Reconciled {
    /// Final report once the commit step has run.
    pub fn into_report(self, config: &Config, commit: CommitOutcome) -> RunReport {
        RunReport {
            app_identifier: config.app_identifier.clone(),
            environment: config.environment,
            profile_uuid: self.profile_uuid,
            reconciliations: self.reconciliations,
            exported: self.exported,
            commit,
        }
    }
}

/// Reconciles one decrypted store checkout.
pub struct Runner<'a, G, I> {
    config: &'a Config,
    workspace: &'a Path,
    generator: G,
    installer: I,
    portal: Option<&'a dyn Portal>,
    dirty: bool,
    reconciliations: Vec<Reconciliation>,
}

impl<'a, G: Generator, I: Installer> Runner<'a, G, I> {
    pub fn new(config: &'a Config, workspace: &'a Path, generator: G, installer: I) -> Self {
        Self {
            config,
            workspace,
            generator,
            installer,
            portal: None,
            dirty: false,
            reconciliations: Vec::new(),
        }
    }

    /// Use a portal for pre-flight checks and device counts.
    pub fn with_portal(mut self, portal: Option<&'a dyn Portal>) -> Self {
        self.portal = portal;
        self
    }

    /// Per-kind results recorded so far, including the kind that failed.
    pub fn reconciliations(&self) -> &[Reconciliation] {
        &self.reconciliations
    }

    /// Reconcile every kind the configuration asks for.
    ///
    /// # Errors
    ///
    /// Returns the first failing kind's error. Read-only runs with a missing
    /// artifact fail with `ReconcileError::ReadOnly`. The failing kind is
    /// then recorded as `State::Failed` in [`Runner::reconciliations`].
    pub fn reconcile(&mut self) -> Result<Reconciled> {
        let config = self.config;
        let mut profile_uuid = None;
        let mut exported = Vec::new();

        if config.android {
            let (source, destination, field) = if config.supply {
                (
                    self.supply_key()?,
                    config.supply_destination.as_deref(),
                    "supply_destination",
                )
            } else {
                (
                    self.android_keystore()?,
                    config.keystore.destination.as_deref(),
                    "keystore_destination",
                )
            };
            let destination = destination.ok_or(ConfigError::MissingField { field })?;
            exported.push(export(&source, destination)?);
        } else {
            let app = config.app_identifier()?;
            let portal = self.preflight_portal();

            if let Some(portal) = portal {
                if !portal.bundle_identifier_exists(app, config.platform)? {
                    return Err(ReconcileError::MissingOnPortal {
                        what: format!("App Identifier '{}'", app),
                    }
                    .into());
                }
            }

            let certificate_id = self.certificate()?;
            if let Some(portal) = portal {
                if !portal.certificate_exists(config.cert_type(), &certificate_id)? {
                    return Err(ReconcileError::MissingOnPortal {
                        what: format!("certificate '{}'", certificate_id),
                    }
                    .into());
                }
            }

            let uuid = self.profile(&certificate_id)?;
            if let Some(portal) = portal {
                if !portal.profile_exists(&uuid)? {
                    return Err(ReconcileError::MissingOnPortal {
                        what: format!("provisioning profile '{}'", uuid),
                    }
                    .into());
                }
            }
            profile_uuid = Some(uuid);
        }

        Ok(Reconciled {
            dirty: self.dirty,
            profile_uuid,
            reconciliations: self.reconciliations.clone(),
            exported,
        })
    }

    /// Reconcile the signing certificate and its private key.
    ///
    /// # Returns
    ///
    /// The certificate identifier (the `.cer` file stem).
    pub fn certificate(&mut self) -> Result<CertificateId> {
        let subtype = self.config.cert_type().as_str();
        let result = self.reconcile_certificate();
        self.settle(CredentialKind::Certificate, subtype, result)
    }

    /// Reconcile the provisioning profile bound to `certificate_id`.
    ///
    /// # Returns
    ///
    /// The profile UUID.
    pub fn profile(&mut self, certificate_id: &str) -> Result<ProfileUuid> {
        let subtype = self.config.profile_type()?.as_str();
        let result = self.reconcile_profile(certificate_id);
        self.settle(CredentialKind::Profile, subtype, result)
    }

    /// Reconcile the Android keystore.
    pub fn android_keystore(&mut self) -> Result<PathBuf> {
        let subtype = self.config.key_type().as_str();
        let result = self.reconcile_key(CredentialKind::Keystore, ArtifactKind::Keystore);
        self.settle(CredentialKind::Keystore, subtype, result)
    }

    /// Reconcile the supply key.
    pub fn supply_key(&mut self) -> Result<PathBuf> {
        let subtype = self.config.key_type().as_str();
        let result = self.reconcile_key(CredentialKind::SupplyKey, ArtifactKind::SupplyKey);
        self.settle(CredentialKind::SupplyKey, subtype, result)
    }

    fn reconcile_certificate(&mut self) -> Result<CertificateId> {
        let cert_type = self.config.cert_type();
        let subtype = cert_type.as_str();
        let certs = locator::find(self.workspace, ArtifactKind::Certificate, subtype, None);
        let keys = locator::find(self.workspace, ArtifactKind::PrivateKey, subtype, None);

        if let (Some(cert), Some(key)) = (certs.last(), keys.last()) {
            info!(certificate = %display_name(cert), "installing certificate");
            let keychain = self.config.keychain_name.as_str();

            if self.installer.is_installed(cert)? {
                debug!(certificate = %display_name(cert), "certificate is already installed on this machine");
            } else {
                self.installer.import(cert, keychain)?;
            }
            // No reliable way to tell whether the key is present, so always import it.
            self.installer.import(key, keychain)?;

            let id = certificate_id(cert);
            self.reconciliations
                .push(Reconciliation::reused(CredentialKind::Certificate, subtype, cert.clone()));
            return Ok(id);
        }

        warn!(
            %cert_type,
            "couldn't find a valid code signing identity in the store, creating one"
        );
        self.ensure_writable(CredentialKind::Certificate, subtype)?;

        let dir = locator::directory(self.workspace, ArtifactKind::Certificate, subtype);
        let path = self.generator.certificate(self.config, cert_type, &dir)?;
        generator::remove_signing_requests(self.workspace)?;
        self.dirty = true;

        let id = certificate_id(&path);
        info!(certificate = %id, "generated certificate");
        self.reconciliations
            .push(Reconciliation::generated(CredentialKind::Certificate, subtype, path));
        Ok(id)
    }

    fn reconcile_profile(&mut self, certificate_id: &str) -> Result<ProfileUuid> {
        let profile_type = self.config.profile_type()?;
        let app = self.config.app_identifier()?;
        let subtype = profile_type.as_str();
        let stem = profile_type.file_stem(app);
        let existing = locator::latest(self.workspace, ArtifactKind::Profile, subtype, Some(&stem));

        let mut force = self.config.force;
        if !force && self.config.force_for_new_devices {
            if let Some(profile) = &existing {
                force = self.device_count_changed(profile)?;
            }
        }

        let (path, generated) = match existing {
            Some(path) if !force => (path, false),
            _ => {
                warn!(%profile_type, app, force, "creating a new provisioning profile");
                self.ensure_writable(CredentialKind::Profile, subtype)?;

                let dir = locator::directory(self.workspace, ArtifactKind::Profile, subtype);
                let produced = self
                    .generator
                    .profile(self.config, profile_type, certificate_id, &dir)?;
                let stored = dir.join(format!("{}.{}", stem, ArtifactKind::Profile.extension()));
                store_as(&produced, &stored)?;
                self.dirty = true;
                (stored, true)
            }
        };

        self.installer.install_profile(&path)?;
        let parsed = ProvisioningProfile::load(&path)?;
        info!(uuid = %parsed.uuid, name = %parsed.name, "provisioning profile ready");

        self.reconciliations.push(if generated {
            Reconciliation::generated(CredentialKind::Profile, subtype, path)
        } else {
            Reconciliation::reused(CredentialKind::Profile, subtype, path)
        });
        Ok(parsed.uuid)
    }

    fn reconcile_key(&mut self, kind: CredentialKind, artifact: ArtifactKind) -> Result<PathBuf> {
        let key_type = self.config.key_type();
        let subtype = key_type.as_str();

        if let Some(path) = locator::latest(self.workspace, artifact, subtype, None) {
            info!(%kind, file = %display_name(&path), "using stored {}", kind);
            self.reconciliations
                .push(Reconciliation::reused(kind, subtype, path.clone()));
            return Ok(path);
        }

        warn!(%kind, %key_type, "no {} found in the store", kind);
        self.ensure_writable(kind, subtype)?;

        let dir = locator::directory(self.workspace, artifact, subtype);
        let path = match kind {
            CredentialKind::SupplyKey => self.generator.supply_key(self.config, key_type, &dir)?,
            _ => self.generator.keystore(self.config, key_type, &dir)?,
        };
        self.dirty = true;

        self.reconciliations
            .push(Reconciliation::generated(kind, subtype, path.clone()));
        Ok(path)
    }

    /// Whether the portal's device count moved away from the one the stored
    /// profile was issued for. Profiles the portal does not know are kept.
    fn device_count_changed(&self, profile: &Path) -> Result<bool> {
        let Some(portal) = self.portal else {
            warn!("force_for_new_devices needs portal access, keeping the stored profile");
            return Ok(false);
        };

        let parsed = ProvisioningProfile::load(profile)?;
        if !portal.profile_exists(&parsed.uuid)? {
            debug!(uuid = %parsed.uuid, "stored profile is not on the portal");
            return Ok(false);
        }

        let portal_count = portal.device_count(self.config.platform)?;
        let profile_count = parsed.device_count();
        let changed = portal_count != profile_count;
        info!(portal_count, profile_count, changed, "compared device counts");
        Ok(changed)
    }

    /// The portal to run existence checks against: only for writable runs.
    fn preflight_portal(&self) -> Option<&'a dyn Portal> {
        if self.config.readonly {
            return None;
        }
        if self.portal.is_none() {
            debug!("no portal configured, skipping pre-flight checks");
        }
        self.portal
    }

    fn ensure_writable(&self, kind: CredentialKind, subtype: &str) -> Result<()> {
        if self.config.readonly {
            return Err(ReconcileError::ReadOnly {
                kind,
                subtype: subtype.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn settle<T>(&mut self, kind: CredentialKind, subtype: &str, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            error!(%kind, subtype, error = %e, "reconciliation failed");
            self.reconciliations
                .push(Reconciliation::failed(kind, subtype));
        }
        result
    }
}

/// Put a generated file at its canonical store location.
fn store_as(produced: &Path, stored: &Path) -> Result<()> {
    if produced == stored {
        return Ok(());
    }
    if let Some(parent) = stored.parent() {
        fs::create_dir_all(parent)?;
    }
    if produced.parent() == stored.parent() {
        fs::rename(produced, stored)?;
    } else {
        fs::copy(produced, stored)?;
    }
    Ok(())
}

/// Copy a decrypted artifact out of the store.
fn export(source: &Path, destination: &Path) -> Result<PathBuf> {
    let target = if destination.is_dir() {
        match source.file_name() {
            Some(name) => destination.join(name),
            None => destination.to_path_buf(),
        }
    } else {
        destination.to_path_buf()
    };
    fs::copy(source, &target)?;
    info!(destination = %target.display(), "put decrypted artifact in place");
    Ok(target)
}

fn certificate_id(path: &Path) -> CertificateId {
    locator::identifier(path).unwrap_or_default()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
