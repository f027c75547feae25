//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A bundle identifier (e.g., tools.fastlane.app).
pub type AppIdentifier = String;

/// Identifier of a signing certificate, the stem of its `.cer` file.
pub type CertificateId = String;

/// UUID embedded in a provisioning profile.
pub type ProfileUuid = String;

/// Remote address of the store repository.
pub type RemoteUrl = String;
