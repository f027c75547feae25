//! macOS Keychain passphrase cache.
//!
//! Passphrases are generic password items under a single service, with the
//! cache key as the account name.

#![cfg(target_os = "macos")]

use security_framework::passwords::{
    delete_generic_password, get_generic_password, set_generic_password,
};
use tracing::{debug, error, info};
use zeroize::Zeroizing;

use super::Cache;
use crate::error::{PassphraseError, Result};

/// errSecItemNotFound
const ITEM_NOT_FOUND: i32 = -25300;
/// errSecUserCanceled
const USER_CANCELED: i32 = -128;

/// Keychain backend for cached passphrases
pub struct Keychain {
    service: String,
}

impl Keychain {
    /// Service name for all matchbook items in Keychain
    const SERVICE_NAME: &'static str = "com.matchbook";

    pub fn new() -> Self {
        Self {
            service: Self::SERVICE_NAME.to_string(),
        }
    }

    fn map_error(e: security_framework::base::Error, action: &str) -> PassphraseError {
        if e.code() == USER_CANCELED {
            PassphraseError::AccessDenied
        } else {
            PassphraseError::Cache(format!("Keychain {} failed: {}", action, e))
        }
    }
}

impl Default for Keychain {
    fn default() -> Self {
        Self::new()
    }
}

impl Cache for Keychain {
    fn get(&self, key: &str) -> Result<Option<Zeroizing<String>>> {
        match get_generic_password(&self.service, key) {
            Ok(bytes) => {
                let secret = String::from_utf8(bytes.to_vec()).map_err(|e| {
                    error!(error = %e, "invalid UTF-8 in Keychain data");
                    PassphraseError::Cache(format!("invalid UTF-8 in Keychain data: {}", e))
                })?;
                debug!(backend = "keychain", "loaded cached passphrase");
                Ok(Some(Zeroizing::new(secret)))
            }
            Err(e) if e.code() == ITEM_NOT_FOUND => {
                debug!(backend = "keychain", "no cached passphrase");
                Ok(None)
            }
            Err(e) => {
                error!(error_code = e.code(), error = %e, "failed to read from Keychain");
                Err(Self::map_error(e, "lookup").into())
            }
        }
    }

    fn set(&self, key: &str, secret: &str) -> Result<()> {
        // set_generic_password refuses duplicates on some macOS versions.
        self.delete(key)?;

        set_generic_password(&self.service, key, secret.as_bytes()).map_err(|e| {
            error!(error = %e, "failed to store passphrase in Keychain");
            Self::map_error(e, "store")
        })?;

        info!(backend = "keychain", "passphrase stored in Keychain");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        match delete_generic_password(&self.service, key) {
            Ok(()) => {
                debug!(backend = "keychain", "removed cached passphrase");
                Ok(())
            }
            Err(e) if e.code() == ITEM_NOT_FOUND => Ok(()),
            Err(e) => {
                error!(error = %e, "failed to delete from Keychain");
                Err(Self::map_error(e, "delete").into())
            }
        }
    }

    fn name(&self) -> &'static str {
        "keychain"
    }
}
