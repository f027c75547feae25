//! Run configuration.
//!
//! [`Config`] is the one explicit configuration value threaded through every
//! operation. Defaults can be kept in `.matchbook.toml`; the CLI layers
//! environment variables and flags on top before calling [`Config::validate`].

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants;
use crate::core::domain::{CertType, Environment, KeyType, Platform, ProfileType};
use crate::core::types::{AppIdentifier, RemoteUrl};
use crate::error::{ConfigError, Result};

/// Everything a run needs to know.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL of the git repo containing all the certificates
    pub git_url: RemoteUrl,
    /// Branch of the store repo
    pub git_branch: String,
    /// Signing environment
    #[serde(rename = "type")]
    pub environment: Environment,
    /// Bundle identifier of the app
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_identifier: Option<AppIdentifier>,
    /// Developer portal username
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Keychain certificates are imported into
    pub keychain_name: String,
    /// Only fetch existing artifacts, never generate or commit
    pub readonly: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    pub verbose: bool,
    pub platform: Platform,
    /// Work with Android keystores instead of Apple certificates
    pub android: bool,
    /// Work with supply JSON keys (Android only)
    pub supply: bool,
    /// JSON key imported when a supply key has to be created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supply_json_import: Option<PathBuf>,
    /// Where the decrypted supply key is copied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supply_destination: Option<PathBuf>,
    pub keystore: KeystoreConfig,
    /// Renew the provisioning profile on every run
    pub force: bool,
    /// Renew the provisioning profile when the portal device count changed
    pub force_for_new_devices: bool,
    /// Clone with a depth of one
    pub shallow_clone: bool,
    /// Use enterprise certificates for enterprise runs
    pub force_enterprise: bool,
}

/// Android keystore options.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeystoreConfig {
    /// Never written back to disk.
    #[serde(skip_serializing)]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Where the decrypted keystore is copied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
}

impl fmt::Debug for KeystoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeystoreConfig")
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .field("alias", &self.alias)
            .field("fullname", &self.fullname)
            .field("city", &self.city)
            .field("destination", &self.destination)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            git_url: String::new(),
            git_branch: constants::DEFAULT_BRANCH.to_string(),
            environment: Environment::default(),
            app_identifier: None,
            username: None,
            keychain_name: constants::DEFAULT_KEYCHAIN.to_string(),
            readonly: false,
            team_id: None,
            team_name: None,
            verbose: false,
            platform: Platform::default(),
            android: false,
            supply: false,
            supply_json_import: None,
            supply_destination: None,
            keystore: KeystoreConfig::default(),
            force: false,
            force_for_new_devices: false,
            shallow_clone: false,
            force_enterprise: false,
        }
    }
}

impl Config {
    /// Configuration for a store with every other option at its default.
    pub fn new(git_url: impl Into<RemoteUrl>) -> Self {
        Self {
            git_url: git_url.into(),
            ..Self::default()
        }
    }

    /// Path of the configuration file inside `dir`.
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(constants::CONFIG_FILE)
    }

    /// Load `.matchbook.toml` from `dir`, or defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the file exists but is malformed.
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let path = Self::path_in(dir);
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        debug!(path = %path.display(), "loading config");
        let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
        let config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        Ok(config)
    }

    /// Write this configuration to `.matchbook.toml` in `dir`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::AlreadyInitialized` when the file exists.
    pub fn save_new(&self, dir: &Path) -> Result<PathBuf> {
        let path = Self::path_in(dir);
        if path.exists() {
            return Err(ConfigError::AlreadyInitialized(path).into());
        }
        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    /// Check that the options describe a run that can actually happen.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` or `ConfigError::InvalidValue`.
    pub fn validate(&self) -> Result<()> {
        if self.git_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "git_url" }.into());
        }

        if self.android {
            if !self.environment.is_android_only() && self.environment != Environment::Development
            {
                return Err(ConfigError::InvalidValue {
                    field: "type",
                    reason: format!(
                        "{} is not available for android, use release or debug",
                        self.environment
                    ),
                }
                .into());
            }
            if self.supply {
                if self.supply_destination.is_none() {
                    return Err(ConfigError::MissingField {
                        field: "supply_destination",
                    }
                    .into());
                }
            } else if self.keystore.destination.is_none() {
                return Err(ConfigError::MissingField {
                    field: "keystore_destination",
                }
                .into());
            }
            return Ok(());
        }

        if self.environment.is_android_only() {
            return Err(ConfigError::InvalidValue {
                field: "type",
                reason: format!("{} is only available together with android", self.environment),
            }
            .into());
        }

        match self.app_identifier.as_deref() {
            Some(app) if !app.trim().is_empty() => Ok(()),
            _ => Err(ConfigError::MissingField {
                field: "app_identifier",
            }
            .into()),
        }
    }

    /// Certificate sub-type for this run.
    pub fn cert_type(&self) -> CertType {
        CertType::for_environment(self.environment, self.force_enterprise)
    }

    /// Profile sub-type for this run.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for Android environments.
    pub fn profile_type(&self) -> Result<ProfileType> {
        ProfileType::for_environment(self.environment).ok_or_else(|| {
            ConfigError::InvalidValue {
                field: "type",
                reason: format!("{} has no provisioning profile", self.environment),
            }
            .into()
        })
    }

    /// Keystore / supply key sub-type for this run.
    pub fn key_type(&self) -> KeyType {
        KeyType::for_environment(self.environment)
    }

    /// App identifier, required for Apple runs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` when unset.
    pub fn app_identifier(&self) -> Result<&str> {
        self.app_identifier
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField {
                field: "app_identifier",
            }
            .into())
    }
}
