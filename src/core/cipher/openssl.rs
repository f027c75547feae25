//! OpenSSL cipher backend.
//!
//! Runs `openssl enc -aes-256-cbc -a`, leaving key derivation to openssl's
//! defaults so stores stay readable by any other tool using the same command.
//!
//! ## Requirements
//!
//! - `openssl` CLI must be installed

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::trace;

use super::{Cipher, Direction};
use crate::core::{constants, tool};
use crate::core::domain::Passphrase;
use crate::error::{CipherError, Result, ToolError};

/// OpenSSL cipher backend using the openssl CLI
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenSsl;

impl OpenSsl {
    /// Check if the openssl CLI is available
    pub fn check() -> Result<()> {
        if tool::available("openssl") {
            Ok(())
        } else {
            Err(ToolError::NotFound("openssl").into())
        }
    }
}

impl Cipher for OpenSsl {
    fn name(&self) -> &'static str {
        "openssl"
    }

    fn transform(
        &self,
        input: &Path,
        output: &Path,
        passphrase: &Passphrase,
        direction: Direction,
    ) -> Result<()> {
        trace!(path = %input.display(), %direction, "running openssl");

        let mut cmd = Command::new("openssl");
        cmd.args(["enc", "-aes-256-cbc", "-a"]);
        if direction == Direction::Decrypt {
            cmd.arg("-d");
        }
        // The passphrase goes through the child's environment so it never
        // shows up in the process list.
        cmd.args(["-pass", format!("env:{}", constants::CIPHER_PASS_ENV).as_str()])
            .arg("-in")
            .arg(input)
            .arg("-out")
            .arg(output)
            .env(constants::CIPHER_PASS_ENV, passphrase.expose())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let result = tool::output("openssl", &mut cmd)?;

        if result.status.success() {
            return Ok(());
        }

        trace!(
            path = %input.display(),
            stderr = %String::from_utf8_lossy(&result.stderr).trim(),
            "openssl failed"
        );

        let path = input.to_path_buf();
        Err(match direction {
            Direction::Decrypt => CipherError::WrongPassphrase { path },
            Direction::Encrypt => CipherError::EncryptionFailed { path },
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::PassphraseSource;
    use tempfile::TempDir;

    fn openssl_available() -> bool {
        OpenSsl::check().is_ok()
    }

    #[test]
    fn test_roundtrip() {
        if !openssl_available() {
            eprintln!("SKIPPED: openssl not installed");
            return;
        }

        let tmp = TempDir::new().unwrap();
        let plain = tmp.path().join("plain.cer");
        let encrypted = tmp.path().join("encrypted");
        let decrypted = tmp.path().join("decrypted");
        let data: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        std::fs::write(&plain, &data).unwrap();
        std::fs::write(&encrypted, b"").unwrap();
        std::fs::write(&decrypted, b"").unwrap();

        let pass = Passphrase::new("correct horse", PassphraseSource::Override);
        OpenSsl
            .transform(&plain, &encrypted, &pass, Direction::Encrypt)
            .unwrap();

        let armored = std::fs::read_to_string(&encrypted).unwrap();
        assert!(armored.starts_with("U2FsdGVkX1"), "expected salted base64 output");

        OpenSsl
            .transform(&encrypted, &decrypted, &pass, Direction::Decrypt)
            .unwrap();
        assert_eq!(std::fs::read(&decrypted).unwrap(), data);
    }

    #[test]
    fn test_decrypt_plaintext_is_rejected() {
        if !openssl_available() {
            eprintln!("SKIPPED: openssl not installed");
            return;
        }

        let tmp = TempDir::new().unwrap();
        let plain = tmp.path().join("plain.cer");
        let out = tmp.path().join("out");
        std::fs::write(&plain, b"definitely not base64 ciphertext!").unwrap();
        std::fs::write(&out, b"").unwrap();

        let pass = Passphrase::new("whatever", PassphraseSource::Override);
        let err = OpenSsl
            .transform(&plain, &out, &pass, Direction::Decrypt)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Cipher(CipherError::WrongPassphrase { .. })
        ));
    }
}
