//! Symmetric encryption of store files.
//!
//! Every credential file in the store is AES-256-CBC encrypted and base64
//! armored. The transform itself is delegated to a [`Cipher`] backend;
//! [`CipherStore`] applies it across a whole working directory.
//!
//! ## Backends
//!
//! - **openssl**: default, shells out to `openssl enc`.

use std::fmt;
use std::path::Path;

use crate::core::domain::Passphrase;
use crate::error::Result;

mod openssl;
mod store;

pub use openssl::OpenSsl;
pub use store::CipherStore;

/// Direction of a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
        })
    }
}

/// A file-to-file symmetric transform.
pub trait Cipher {
    /// Read `input`, transform it in `direction`, write the result to `output`.
    ///
    /// `output` already exists and must be overwritten. `input` is never
    /// modified.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::WrongPassphrase` when a decrypt is rejected,
    /// `CipherError::EncryptionFailed` when an encrypt is rejected, and
    /// `ToolError` when the backend itself cannot run.
    fn transform(
        &self,
        input: &Path,
        output: &Path,
        passphrase: &Passphrase,
        direction: Direction,
    ) -> Result<()>;

    /// Backend name for logging.
    fn name(&self) -> &'static str;
}

impl<C: Cipher + ?Sized> Cipher for &C {
    fn transform(
        &self,
        input: &Path,
        output: &Path,
        passphrase: &Passphrase,
        direction: Direction,
    ) -> Result<()> {
        (**self).transform(input, output, passphrase, direction)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
