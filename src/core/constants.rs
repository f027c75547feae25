//! Constants used throughout matchbook.
//!
//! Centralizes magic strings and configuration values.

/// File extensions the cipher layer acts on.
pub const ENCRYPTED_EXTENSIONS: &[&str] = &["cer", "p12", "mobileprovision", "keystore", "supply"];

/// Tag at the start of every commit message.
pub const COMMIT_TAG: &str = "fastlane";

/// Prefix of the credential cache key for a store.
pub const CACHE_KEY_PREFIX: &str = "match";

/// Optional configuration file in the working directory.
pub const CONFIG_FILE: &str = ".matchbook.toml";

/// Version marker written to the store root before every commit.
pub const VERSION_FILE: &str = "match_version.txt";

/// Marker touched by manual imports.
pub const MANUAL_MARK_FILE: &str = "match_manual.mark";

/// Passphrase override variable.
pub const PASSWORD_ENV: &str = "MATCH_PASSWORD";

/// Variable used to hand the passphrase to `openssl` without putting it on
/// the command line.
pub const CIPHER_PASS_ENV: &str = "MATCHBOOK_CIPHER_PASSPHRASE";

/// Set to disable the macOS Keychain cache backend.
pub const NO_KEYCHAIN_ENV: &str = "MATCHBOOK_NO_KEYCHAIN";

/// Cache directory relative to HOME (`~/.matchbook/passphrases`).
pub const CACHE_DIR: &str = ".matchbook/passphrases";

/// Byproduct of certificate issuance that must never be stored.
pub const SIGNING_REQUEST_EXTENSION: &str = "certSigningRequest";

/// Default git branch of the store.
pub const DEFAULT_BRANCH: &str = "master";

/// Default keychain certificates are imported into.
pub const DEFAULT_KEYCHAIN: &str = "login.keychain";
