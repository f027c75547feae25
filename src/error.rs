//! Error types.
//!
//! Each concern has its own error enum; [`Error`] wraps them all so that
//! `?` works across module boundaries. [`Error::category`] maps any error onto
//! the four user-facing classes the CLI reports on.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::domain::CredentialKind;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Passphrase(#[from] PassphraseError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Install(#[from] InstallError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification used for exit handling and hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Fatal; the user has to change an input.
    UserInput,
    /// A stored passphrase failed to decrypt; one retry is allowed.
    RecoverableAuth,
    /// The portal refuses to issue more certificates.
    AccountLimit,
    /// An external tool failed for reasons unrelated to the passphrase.
    TransientTool,
    /// Local filesystem failure.
    Io,
}

impl Error {
    /// Classify this error.
    pub fn category(&self) -> Category {
        match self {
            Error::Config(_) => Category::UserInput,
            Error::Passphrase(PassphraseError::Cache(_)) => Category::TransientTool,
            Error::Passphrase(_) => Category::UserInput,
            Error::Cipher(CipherError::WrongPassphrase { .. }) => Category::RecoverableAuth,
            Error::Cipher(_) => Category::UserInput,
            Error::Tool(_) => Category::TransientTool,
            Error::Generation(GenerationError::AccountLimit) => Category::AccountLimit,
            Error::Generation(GenerationError::Failed { .. }) => Category::TransientTool,
            Error::Generation(GenerationError::NoOutput { .. }) => Category::TransientTool,
            Error::Reconcile(_) => Category::UserInput,
            Error::Install(_) => Category::TransientTool,
            Error::Io(_) => Category::Io,
        }
    }
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required option: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config file: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("config file already exists: {0}")]
    AlreadyInitialized(PathBuf),

    #[error("{0}")]
    Manual(String),
}

/// Passphrase resolution errors.
#[derive(Error, Debug)]
pub enum PassphraseError {
    #[error("no passphrase available: stdin is not a terminal and MATCH_PASSWORD is not set")]
    NotInteractive,

    #[error("no passphrase supplied")]
    Blank,

    #[error("passphrase prompt failed: {0}")]
    Prompt(String),

    #[error("credential cache error: {0}")]
    Cache(String),

    #[error("credential cache access denied")]
    AccessDenied,
}

/// Cipher layer errors.
#[derive(Error, Debug)]
pub enum CipherError {
    /// A file could not be decrypted. The cipher gives no way to tell a wrong
    /// passphrase from a corrupt file, so this is always treated as the former.
    #[error("couldn't decrypt '{}': wrong passphrase?", path.display())]
    WrongPassphrase { path: PathBuf },

    #[error("couldn't encrypt '{}'", path.display())]
    EncryptionFailed { path: PathBuf },

    #[error("invalid passphrase passed via 'MATCH_PASSWORD'")]
    InvalidOverride,

    #[error("couldn't decrypt the repo, the passphrase was rejected twice")]
    PassphraseRejected,
}

/// External tool invocation errors.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{0} not found in PATH")]
    NotFound(&'static str),

    #[error("{tool} failed: {message}")]
    Failed { tool: &'static str, message: String },

    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Artifact generation errors.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error(
        "could not create a new certificate: the maximum number of certificates for this \
         account has been reached. Revoke an existing certificate and try again"
    )]
    AccountLimit,

    #[error("generating {kind} failed: {message}")]
    Failed {
        kind: CredentialKind,
        message: String,
    },

    #[error("generating {kind} produced no file in '{}'", dir.display())]
    NoOutput { kind: CredentialKind, dir: PathBuf },
}

/// Reconciliation errors.
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("no {kind} found for {subtype} and can not create a new one because readonly is enabled")]
    ReadOnly {
        kind: CredentialKind,
        subtype: String,
    },

    #[error("{what} does not exist on the developer portal")]
    MissingOnPortal { what: String },

    #[error("invalid provisioning profile '{}': {reason}", path.display())]
    InvalidProfile { path: PathBuf, reason: String },
}

/// Local installation errors.
#[derive(Error, Debug)]
pub enum InstallError {
    #[error("failed to import '{}' into {keychain}: {message}", path.display())]
    Import {
        path: PathBuf,
        keychain: String,
        message: String,
    },

    #[error("unable to determine home directory")]
    NoHome,
}

pub type Result<T> = std::result::Result<T, Error>;
