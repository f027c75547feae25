//! Suggestions printed under an error.

use crate::error::{
    Category, CipherError, ConfigError, Error, PassphraseError, ReconcileError, ToolError,
};

/// A suggestion for an error, if the user can act on it.
///
/// Specific errors get a specific hint; everything else falls back to one
/// per [`Category`].
pub fn for_error(e: &Error) -> Option<String> {
    let hint = match e {
        Error::Config(ConfigError::MissingField { field: "git_url" }) => {
            "run: matchbook init <git_url>, or pass --git-url"
        }
        Error::Config(ConfigError::AlreadyInitialized(_)) => {
            "edit the existing .matchbook.toml instead"
        }
        Error::Passphrase(PassphraseError::NotInteractive) => {
            "set MATCH_PASSWORD to the store passphrase"
        }
        Error::Cipher(CipherError::InvalidOverride) => "check the value of MATCH_PASSWORD",
        Error::Cipher(CipherError::PassphraseRejected) => {
            "make sure you enter the passphrase the store was encrypted with"
        }
        Error::Reconcile(ReconcileError::ReadOnly { .. }) => {
            "run without --readonly on a machine with developer portal access"
        }
        Error::Tool(ToolError::NotFound(tool)) => {
            return Some(format!("install {} and make sure it is in PATH", tool));
        }
        _ => return by_category(e.category()).map(str::to_string),
    };
    Some(hint.to_string())
}

fn by_category(category: Category) -> Option<&'static str> {
    match category {
        Category::UserInput => None,
        Category::RecoverableAuth => Some("run: matchbook passphrase forget, then try again"),
        Category::AccountLimit => {
            Some("revoke an unused certificate on the developer portal, then run again")
        }
        Category::TransientTool => Some("run again with --verbose to see the tool output"),
        Category::Io => Some("check the permissions of the store checkout and your home directory"),
    }
}
