//! In-process cache.
//!
//! Used when nothing should outlive the process, and by tests.

use std::collections::HashMap;
use std::sync::Mutex;

use zeroize::Zeroizing;

use super::Cache;
use crate::error::{PassphraseError, Result};

/// A cache that forgets everything when dropped.
#[derive(Debug, Default)]
pub struct Memory {
    entries: Mutex<HashMap<String, Zeroizing<String>>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache pre-populated with one entry.
    pub fn with(key: &str, secret: &str) -> Self {
        let cache = Self::new();
        if let Ok(mut entries) = cache.entries.lock() {
            entries.insert(key.to_string(), Zeroizing::new(secret.to_string()));
        }
        cache
    }

    /// Whether an entry exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .map(|e| e.contains_key(key))
            .unwrap_or(false)
    }

    fn poisoned() -> PassphraseError {
        PassphraseError::Cache("memory cache lock poisoned".to_string())
    }
}

impl Cache for Memory {
    fn get(&self, key: &str) -> Result<Option<Zeroizing<String>>> {
        let entries = self.entries.lock().map_err(|_| Self::poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, secret: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| Self::poisoned())?;
        entries.insert(key.to_string(), Zeroizing::new(secret.to_string()));
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| Self::poisoned())?;
        entries.remove(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
