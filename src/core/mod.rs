//! Core library components.
//!
//! Everything needed to keep an encrypted signing store in sync with the
//! developer portal, independent of how it is invoked.

pub mod cache;
pub mod cipher;
pub mod commit;
pub mod config;
pub mod constants;
pub mod domain;
pub mod generator;
pub mod git;
pub mod installer;
pub mod locator;
pub mod manual;
pub mod passphrase;
pub mod pipeline;
pub mod portal;
pub mod runner;
pub mod tool;
pub mod types;
