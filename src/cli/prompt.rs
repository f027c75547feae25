//! Interactive passphrase prompt.

use dialoguer::Password;

use crate::cli::output;
use crate::core::cache::default_backend;
use crate::core::passphrase::{Passphrases, Prompt};
use crate::error::{PassphraseError, Result};

/// Asks on the terminal, with hidden input.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn ask(&self, confirm: bool) -> Result<String> {
        if !atty::is(atty::Stream::Stdin) {
            return Err(PassphraseError::NotInteractive.into());
        }

        output::warn("Enter the passphrase that should be used to encrypt/decrypt your certificates");
        output::dimmed("This passphrase is specific per repository and will be stored on this machine");
        output::dimmed("Make sure to remember it, you'll need it when you run matchbook on a different machine");

        let mut prompt = Password::new();
        prompt = prompt.with_prompt("Passphrase for the certificates repo");
        if confirm {
            prompt = prompt.with_confirmation("Type passphrase again", "Passphrases don't match");
        }

        prompt
            .interact()
            .map_err(|e| PassphraseError::Prompt(e.to_string()).into())
    }
}

/// The passphrase provider for CLI commands: `MATCH_PASSWORD`, then the
/// platform cache, then this prompt.
pub fn passphrases() -> Passphrases {
    Passphrases::from_env(default_backend(), Box::new(TerminalPrompt))
}
