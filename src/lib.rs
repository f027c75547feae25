//! Matchbook - share code signing identities through an encrypted git repository.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── run           # Fetch, reconcile and install
//! │   ├── import        # Manual import of existing files
//! │   ├── crypt         # encrypt / decrypt a local checkout
//! │   ├── passphrase    # forget / change the store passphrase
//! │   ├── init          # Write .matchbook.toml
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── config        # Run configuration and .matchbook.toml
//!     ├── domain/       # Kinds, passphrases, profiles, reports
//!     ├── cache/        # Passphrase cache backends
//!     ├── passphrase    # Passphrase resolution
//!     ├── cipher/       # openssl transform and whole-store encryption
//!     ├── locator       # Finding artifacts in a store
//!     ├── generator/    # Creating new artifacts
//!     ├── installer     # Keychain and profile installation
//!     ├── portal        # Developer portal queries
//!     ├── git           # Store checkouts
//!     ├── commit        # Writing changes back
//!     ├── runner        # Reconciliation engine
//!     ├── manual        # Manual import
//!     └── pipeline      # End-to-end operations
//! ```
//!
//! # Features
//!
//! - AES-256-CBC encrypted store, compatible with `openssl enc`
//! - Passphrase cached in the macOS Keychain or a private file
//! - Reuse-or-generate reconciliation for certificates and profiles
//! - Android keystores and supply keys
//! - Read-only mode for CI machines

pub mod cli;
pub mod core;
pub mod error;
