//! Filesystem-based passphrase cache.
//!
//! Stores one file per store under `~/.matchbook/passphrases/`, named by the
//! SHA-256 of the cache key so remote URLs never appear in file names.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::Cache;
use crate::core::constants;
use crate::error::{PassphraseError, Result};

/// Filesystem-based passphrase cache.
#[derive(Debug, Clone)]
pub struct Filesystem {
    dir: PathBuf,
}

impl Filesystem {
    /// Cache rooted in the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns `PassphraseError::Cache` when the home directory is unknown.
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            PassphraseError::Cache("unable to determine home directory".to_string())
        })?;
        Ok(Self::at(home.join(constants::CACHE_DIR)))
    }

    /// Cache rooted at an explicit directory.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.dir.join(format!("{:x}", digest))
    }

    fn write_err(e: std::io::Error) -> PassphraseError {
        PassphraseError::Cache(format!("write failed: {}", e))
    }
}

/// Warn when a cache file is readable by anyone but its owner (Unix only).
#[cfg(unix)]
fn check_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(metadata) = fs::metadata(path) {
        let mode = metadata.permissions().mode() & 0o777;
        if mode & 0o077 != 0 {
            warn!(
                path = %path.display(),
                mode = %format!("{:o}", mode),
                "insecure passphrase cache permissions"
            );
        }
    }
}

#[cfg(not(unix))]
fn check_permissions(_path: &Path) {}

impl Cache for Filesystem {
    fn get(&self, key: &str) -> Result<Option<Zeroizing<String>>> {
        let path = self.entry_path(key);
        if !path.exists() {
            debug!(backend = "filesystem", "no cached passphrase");
            return Ok(None);
        }

        check_permissions(&path);

        let contents = fs::read_to_string(&path)
            .map_err(|e| PassphraseError::Cache(format!("read failed: {}", e)))?;
        let secret = Zeroizing::new(contents.trim_end_matches('\n').to_string());
        drop(Zeroizing::new(contents));

        debug!(backend = "filesystem", "loaded cached passphrase");
        Ok(Some(secret))
    }

    fn set(&self, key: &str, secret: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(Self::write_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.dir, fs::Permissions::from_mode(0o700))
                .map_err(Self::write_err)?;
        }

        // NamedTempFile is created with 0600 on Unix, so the secret is never
        // readable by others, even before the rename.
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(Self::write_err)?;
        writeln!(tmp, "{}", secret).map_err(Self::write_err)?;
        tmp.persist(self.entry_path(key))
            .map_err(|e| Self::write_err(e.error))?;

        debug!(backend = "filesystem", "cached passphrase");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => {
                debug!(backend = "filesystem", "removed cached passphrase");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PassphraseError::Cache(format!("remove failed: {}", e)).into()),
        }
    }

    fn name(&self) -> &'static str {
        "filesystem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let cache = Filesystem::at(tmp.path().join("passphrases"));

        assert!(cache.get("match_https://example.com/certs").unwrap().is_none());

        cache.set("match_https://example.com/certs", "s3cret").unwrap();
        let got = cache.get("match_https://example.com/certs").unwrap().unwrap();
        assert_eq!(got.as_str(), "s3cret");

        cache.set("match_https://example.com/certs", "changed").unwrap();
        let got = cache.get("match_https://example.com/certs").unwrap().unwrap();
        assert_eq!(got.as_str(), "changed");

        cache.delete("match_https://example.com/certs").unwrap();
        assert!(cache.get("match_https://example.com/certs").unwrap().is_none());
        cache.delete("match_https://example.com/certs").unwrap();
    }

    #[test]
    fn test_file_name_hides_key() {
        let tmp = TempDir::new().unwrap();
        let cache = Filesystem::at(tmp.path());
        cache.set("match_git@github.com:org/certs.git", "x").unwrap();

        for entry in fs::read_dir(tmp.path()).unwrap() {
            let name = entry.unwrap().file_name().to_string_lossy().to_string();
            assert!(!name.contains("github"));
            assert_eq!(name.len(), 64);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_entry_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let cache = Filesystem::at(tmp.path().join("c"));
        cache.set("k", "v").unwrap();

        let mode = fs::metadata(cache.entry_path("k"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
