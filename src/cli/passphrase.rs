//! Passphrase commands.

use crate::cli::crypt::identity;
use crate::cli::{load_config, output, prompt, StoreArgs};
use crate::core::cipher::OpenSsl;
use crate::core::domain::CommitOutcome;
use crate::core::git::Git;
use crate::core::pipeline;
use crate::error::Result;

/// Remove the cached passphrase of a store.
pub fn forget(git_url: Option<String>, verbose: bool) -> Result<()> {
    let identity = identity(git_url, verbose)?;
    prompt::passphrases().invalidate(&identity)?;
    output::success(&format!("forgot the passphrase for {}", identity));
    Ok(())
}

/// Re-encrypt the store with a new passphrase.
pub fn change(store: StoreArgs, verbose: bool) -> Result<()> {
    let mut config = load_config(verbose)?;
    store.apply(&mut config);

    Git::check()?;
    OpenSsl::check()?;

    let passphrases = prompt::passphrases();
    match pipeline::change_passphrase(&config, &Git, &OpenSsl, &passphrases)? {
        CommitOutcome::Committed { message } => {
            output::success(&format!("pushed \"{}\"", message));
            output::success("Successfully changed the passphrase, make sure to share it with your team");
        }
        _ => output::dimmed("store unchanged"),
    }
    Ok(())
}
