//! Backend selection for the passphrase cache.
//!
//! On macOS the Keychain is used (falling back to the filesystem for reads);
//! elsewhere, or with MATCHBOOK_NO_KEYCHAIN set, the filesystem cache is used.

use tracing::info;

use super::{Cache, Filesystem, Memory};
#[cfg(target_os = "macos")]
use crate::core::constants;
#[cfg(target_os = "macos")]
use crate::error::Result;
#[cfg(target_os = "macos")]
use zeroize::Zeroizing;

#[cfg(target_os = "macos")]
use super::keychain::Keychain;

/// Default cache backend for this platform.
///
/// Falls back to an in-memory cache when no home directory can be found, so
/// that a run still works and simply forgets the passphrase afterwards.
pub fn default_backend() -> Box<dyn Cache> {
    let filesystem = match Filesystem::new() {
        Ok(fs) => fs,
        Err(e) => {
            info!(error = %e, "using in-memory passphrase cache");
            return Box::new(Memory::new());
        }
    };

    #[cfg(target_os = "macos")]
    {
        if std::env::var(constants::NO_KEYCHAIN_ENV).is_err() {
            info!("using macOS Keychain passphrase cache");
            return Box::new(KeychainThenFilesystem {
                keychain: Keychain::new(),
                filesystem,
            });
        }
        info!("using filesystem passphrase cache (MATCHBOOK_NO_KEYCHAIN set)");
    }

    #[cfg(not(target_os = "macos"))]
    info!("using filesystem passphrase cache");

    Box::new(filesystem)
}

#[cfg(target_os = "macos")]
struct KeychainThenFilesystem {
    keychain: Keychain,
    filesystem: Filesystem,
}

#[cfg(target_os = "macos")]
impl Cache for KeychainThenFilesystem {
    fn get(&self, key: &str) -> Result<Option<Zeroizing<String>>> {
        match self.keychain.get(key)? {
            Some(secret) => Ok(Some(secret)),
            None => self.filesystem.get(key),
        }
    }

    fn set(&self, key: &str, secret: &str) -> Result<()> {
        self.keychain.set(key, secret)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.keychain.delete(key)?;
        self.filesystem.delete(key)
    }

    fn name(&self) -> &'static str {
        "keychain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backend_returns_cache() {
        let backend = default_backend();
        assert!(!backend.name().is_empty());
    }
}
