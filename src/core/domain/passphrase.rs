//! Passphrase type.
//!
//! Wraps the store passphrase so it is wiped from memory on drop and never
//! shows up in `Debug` output.

use std::fmt;

use zeroize::Zeroizing;

/// Where a passphrase came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassphraseSource {
    /// `MATCH_PASSWORD`; there is no interactive way to correct it.
    Override,
    /// The OS credential cache.
    Cache,
    /// Typed by the user in this process.
    Prompt,
}

/// A store passphrase.
#[derive(Clone)]
pub struct Passphrase {
    value: Zeroizing<String>,
    source: PassphraseSource,
}

impl Passphrase {
    pub fn new(value: impl Into<String>, source: PassphraseSource) -> Self {
        Self {
            value: Zeroizing::new(value.into()),
            source,
        }
    }

    /// The secret itself.
    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn source(&self) -> PassphraseSource {
        self.source
    }

    /// Whether the passphrase is empty once surrounding whitespace is ignored.
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Passphrase")
            .field("value", &"[redacted]")
            .field("source", &self.source)
            .finish()
    }
}
