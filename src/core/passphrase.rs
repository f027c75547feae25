//! Passphrase resolution.
//!
//! A store has exactly one passphrase for its whole lifetime. It is resolved
//! from, in order: an explicit override (`MATCH_PASSWORD`), the credential
//! cache, and finally an interactive prompt whose answer is cached.

use std::fmt;

use tracing::{debug, info, warn};

use crate::core::cache::Cache;
use crate::core::constants;
use crate::core::domain::{Passphrase, PassphraseSource};
use crate::error::{PassphraseError, Result};

/// Cache key scoping one passphrase to one store, derived from its remote
/// address (e.g. `match_https://github.com/org/certs`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreIdentity(String);

impl StoreIdentity {
    pub fn from_remote(remote: &str) -> Self {
        Self(format!("{}_{}", constants::CACHE_KEY_PREFIX, remote))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Asks the user for a passphrase.
pub trait Prompt {
    /// Ask for a new or existing passphrase.
    ///
    /// With `confirm`, the user has to type it twice.
    ///
    /// # Errors
    ///
    /// Returns `PassphraseError::NotInteractive` when nobody can answer.
    fn ask(&self, confirm: bool) -> Result<String>;
}

/// A prompt for non-interactive contexts: always fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompt;

impl Prompt for NoPrompt {
    fn ask(&self, _confirm: bool) -> Result<String> {
        Err(PassphraseError::NotInteractive.into())
    }
}

/// The passphrase provider.
pub struct Passphrases {
    override_value: Option<String>,
    cache: Box<dyn Cache>,
    prompt: Box<dyn Prompt>,
}

impl Passphrases {
    pub fn new(
        override_value: Option<String>,
        cache: Box<dyn Cache>,
        prompt: Box<dyn Prompt>,
    ) -> Self {
        Self {
            override_value,
            cache,
            prompt,
        }
    }

    /// Provider reading the override from `MATCH_PASSWORD`.
    pub fn from_env(cache: Box<dyn Cache>, prompt: Box<dyn Prompt>) -> Self {
        Self::new(std::env::var(constants::PASSWORD_ENV).ok(), cache, prompt)
    }

    /// Resolve the passphrase for a store.
    ///
    /// Only a non-blank prompted answer is cached.
    ///
    /// # Errors
    ///
    /// Returns `PassphraseError` if the cache fails, the prompt cannot be
    /// answered, or the answer is blank.
    pub fn resolve(&self, identity: &StoreIdentity) -> Result<Passphrase> {
        if let Some(value) = &self.override_value {
            debug!(store = %identity, "using passphrase from MATCH_PASSWORD");
            return Ok(Passphrase::new(value.clone(), PassphraseSource::Override));
        }

        if let Some(cached) = self.cache.get(identity.as_str())? {
            debug!(store = %identity, backend = self.cache.name(), "using cached passphrase");
            return Ok(Passphrase::new(cached.as_str(), PassphraseSource::Cache));
        }

        info!(store = %identity, "asking for the store passphrase");
        let typed = self.ask_new()?;
        self.store(identity, &typed)?;
        Ok(typed)
    }

    /// Ask for a replacement passphrase without touching the cache.
    ///
    /// # Errors
    ///
    /// Returns `PassphraseError::Blank` for an empty answer.
    pub fn ask_new(&self) -> Result<Passphrase> {
        let typed = Passphrase::new(self.prompt.ask(true)?, PassphraseSource::Prompt);
        if typed.is_blank() {
            return Err(PassphraseError::Blank.into());
        }
        Ok(typed)
    }

    /// Persist a passphrase, replacing any cached value.
    ///
    /// # Errors
    ///
    /// Returns `PassphraseError::Cache` if the backend cannot be written.
    pub fn store(&self, identity: &StoreIdentity, passphrase: &Passphrase) -> Result<()> {
        self.cache.set(identity.as_str(), passphrase.expose())?;
        debug!(store = %identity, backend = self.cache.name(), "passphrase cached");
        Ok(())
    }

    /// Forget the cached passphrase. A missing entry is fine.
    ///
    /// # Errors
    ///
    /// Returns `PassphraseError::Cache` if the backend refuses the removal.
    pub fn invalidate(&self, identity: &StoreIdentity) -> Result<()> {
        warn!(store = %identity, backend = self.cache.name(), "removing cached passphrase");
        self.cache.delete(identity.as_str())
    }
}
