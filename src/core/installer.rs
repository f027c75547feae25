//! Installing signing material on the local machine.
//!
//! Certificates and private keys go into a keychain through the `security`
//! tool; provisioning profiles are copied to the directory Xcode reads them
//! from, named by their UUID.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::core::domain::ProvisioningProfile;
use crate::core::tool;
use crate::error::{InstallError, Result};

/// Output text of `security import` for an item the keychain already has.
const ALREADY_EXISTS: &str = "already exists";

/// Installs artifacts locally.
pub trait Installer {
    /// Whether a certificate is already present in any keychain.
    fn is_installed(&self, certificate: &Path) -> Result<bool>;

    /// Import a certificate or private key bundle into `keychain`. Importing
    /// an item the keychain already holds succeeds.
    fn import(&self, path: &Path, keychain: &str) -> Result<()>;

    /// Install a provisioning profile.
    ///
    /// # Returns
    ///
    /// The installed location.
    fn install_profile(&self, profile: &Path) -> Result<PathBuf>;
}

impl<I: Installer + ?Sized> Installer for &I {
    fn is_installed(&self, certificate: &Path) -> Result<bool> {
        (**self).is_installed(certificate)
    }

    fn import(&self, path: &Path, keychain: &str) -> Result<()> {
        (**self).import(path, keychain)
    }

    fn install_profile(&self, profile: &Path) -> Result<PathBuf> {
        (**self).install_profile(profile)
    }
}

/// The macOS installer.
#[derive(Debug, Clone)]
pub struct System {
    profiles_dir: PathBuf,
}

impl System {
    /// Installer writing profiles to `~/Library/MobileDevice/Provisioning Profiles`.
    ///
    /// # Errors
    ///
    /// Returns `InstallError::NoHome` without a home directory.
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir().ok_or(InstallError::NoHome)?;
        Ok(Self {
            profiles_dir: home.join("Library/MobileDevice/Provisioning Profiles"),
        })
    }

    /// Installer writing profiles to a custom directory.
    pub fn with_profiles_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            profiles_dir: dir.into(),
        }
    }
}

impl Installer for System {
    fn is_installed(&self, certificate: &Path) -> Result<bool> {
        let fingerprint = sha256_fingerprint(&fs::read(certificate)?);

        let mut cmd = Command::new("security");
        cmd.args(["find-certificate", "-a", "-Z"]);
        let listing = tool::run("security", &mut cmd)?;

        let installed = listing_contains(&listing, &fingerprint);
        debug!(
            certificate = %certificate.display(),
            installed,
            "checked keychain for certificate"
        );
        Ok(installed)
    }

    fn import(&self, path: &Path, keychain: &str) -> Result<()> {
        let keychain_path = resolve_keychain(keychain);

        let mut cmd = Command::new("security");
        cmd.arg("import")
            .arg(path)
            .arg("-k")
            .arg(&keychain_path)
            .args(["-P", "", "-T", "/usr/bin/codesign", "-T", "/usr/bin/security"]);
        let out = tool::output("security", &mut cmd)?;
        let message = tool::failure_message(&out);

        if out.status.success() || message.contains(ALREADY_EXISTS) {
            info!(file = %path.display(), keychain = %keychain_path.display(), "imported into keychain");
            return Ok(());
        }

        Err(InstallError::Import {
            path: path.to_path_buf(),
            keychain: keychain.to_string(),
            message,
        }
        .into())
    }

    fn install_profile(&self, profile: &Path) -> Result<PathBuf> {
        let parsed = ProvisioningProfile::load(profile)?;
        fs::create_dir_all(&self.profiles_dir)?;

        let destination = self
            .profiles_dir
            .join(format!("{}.mobileprovision", parsed.uuid));
        fs::copy(profile, &destination)?;

        info!(uuid = %parsed.uuid, name = %parsed.name, "installed provisioning profile");
        Ok(destination)
    }
}

/// Keychain names without a path live in `~/Library/Keychains`.
fn resolve_keychain(name: &str) -> PathBuf {
    let path = Path::new(name);
    if path.components().count() > 1 {
        return path.to_path_buf();
    }
    match dirs::home_dir() {
        Some(home) => home.join("Library/Keychains").join(name),
        None => path.to_path_buf(),
    }
}

fn sha256_fingerprint(der: &[u8]) -> String {
    Sha256::digest(der)
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect()
}

/// `security find-certificate -Z` prints a `SHA-256 hash: <HEX>` line per
/// certificate on recent systems.
fn listing_contains(listing: &str, fingerprint: &str) -> bool {
    listing
        .lines()
        .filter_map(|line| line.trim().strip_prefix("SHA-256 hash:"))
        .any(|hash| hash.trim().eq_ignore_ascii_case(fingerprint))
}
