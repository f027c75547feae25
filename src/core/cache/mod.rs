//! Passphrase cache backends.
//!
//! The passphrase for a store is remembered between runs in an OS-level
//! credential store, keyed by a string derived from the store's remote
//! address.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Cache` trait
//! 2. Add the implementation in a new file
//! 3. Wire it into `default_backend` if it should be picked automatically

use std::sync::Arc;

use zeroize::Zeroizing;

use crate::error::Result;

mod backend;
mod fs;
mod memory;

#[cfg(target_os = "macos")]
pub mod keychain;

pub use backend::default_backend;
pub use fs::Filesystem;
pub use memory::Memory;

/// Keyed secret storage.
pub trait Cache {
    /// Look up a cached secret.
    ///
    /// # Returns
    ///
    /// `None` when nothing is cached under `key`.
    ///
    /// # Errors
    ///
    /// Returns `PassphraseError::Cache` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<Zeroizing<String>>>;

    /// Store a secret, replacing any previous value for `key`.
    ///
    /// # Errors
    ///
    /// Returns `PassphraseError::Cache` if the backend cannot be written.
    fn set(&self, key: &str, secret: &str) -> Result<()>;

    /// Remove a secret. Removing a missing entry is not an error.
    ///
    /// # Errors
    ///
    /// Returns `PassphraseError::Cache` if the backend refuses the removal.
    fn delete(&self, key: &str) -> Result<()>;

    /// Backend name for logging.
    fn name(&self) -> &'static str;
}

impl<C: Cache + ?Sized> Cache for Arc<C> {
    fn get(&self, key: &str) -> Result<Option<Zeroizing<String>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, secret: &str) -> Result<()> {
        (**self).set(key, secret)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
