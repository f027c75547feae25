//! Credential kinds and sub-types.
//!
//! Every artifact in the store lives at `<kind dir>/<sub-type>/<file>.<ext>`;
//! these types own that mapping.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The `type` option: which signing environment a run targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Appstore,
    Adhoc,
    #[default]
    Development,
    Enterprise,
    Release,
    Debug,
}

impl Environment {
    /// All accepted values, in the order they are listed to users.
    pub const ALL: &'static [Environment] = &[
        Environment::Appstore,
        Environment::Adhoc,
        Environment::Development,
        Environment::Enterprise,
        Environment::Release,
        Environment::Debug,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Appstore => "appstore",
            Self::Adhoc => "adhoc",
            Self::Development => "development",
            Self::Enterprise => "enterprise",
            Self::Release => "release",
            Self::Debug => "debug",
        }
    }

    /// Whether this value only makes sense for Android stores.
    pub fn is_android_only(&self) -> bool {
        matches!(self, Self::Release | Self::Debug)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|e| e.as_str()).collect();
                format!("unsupported environment {}, must be in {}", s, names.join(", "))
            })
    }
}

/// Apple platform passed through to profile generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Ios,
    Macos,
    Tvos,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Macos => "macos",
            Self::Tvos => "tvos",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ios" => Ok(Self::Ios),
            "macos" => Ok(Self::Macos),
            "tvos" => Ok(Self::Tvos),
            other => Err(format!("unsupported platform {}, must be in ios, macos, tvos", other)),
        }
    }
}

/// Signing certificate sub-type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertType {
    Development,
    Distribution,
    Enterprise,
}

impl CertType {
    /// Certificate sub-type for an environment.
    ///
    /// Enterprise certificates are only used when the account is forced into
    /// enterprise mode; otherwise enterprise runs share the distribution one.
    pub fn for_environment(environment: Environment, force_enterprise: bool) -> Self {
        match environment {
            Environment::Development => Self::Development,
            Environment::Enterprise if force_enterprise => Self::Enterprise,
            _ => Self::Distribution,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Distribution => "distribution",
            Self::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for CertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provisioning profile sub-type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileType {
    Development,
    AdHoc,
    AppStore,
    Enterprise,
}

impl ProfileType {
    /// Profile sub-type for an Apple environment, `None` for Android ones.
    pub fn for_environment(environment: Environment) -> Option<Self> {
        match environment {
            Environment::Development => Some(Self::Development),
            Environment::Adhoc => Some(Self::AdHoc),
            Environment::Appstore => Some(Self::AppStore),
            Environment::Enterprise => Some(Self::Enterprise),
            Environment::Release | Environment::Debug => None,
        }
    }

    /// Directory name under `profiles/`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::AdHoc => "adhoc",
            Self::AppStore => "appstore",
            Self::Enterprise => "enterprise",
        }
    }

    /// Name used in profile file names and portal profile names.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Development => "Development",
            Self::AdHoc => "AdHoc",
            Self::AppStore => "AppStore",
            Self::Enterprise => "InHouse",
        }
    }

    /// File stem of the stored profile for an app, e.g. `AppStore_tools.fastlane.app`.
    pub fn file_stem(&self, app_identifier: &str) -> String {
        format!("{}_{}", self.type_name(), app_identifier)
    }
}

impl fmt::Display for ProfileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Android key sub-type, shared by keystores and supply keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    Release,
    Debug,
}

impl KeyType {
    pub fn for_environment(environment: Environment) -> Self {
        if environment == Environment::Debug {
            Self::Debug
        } else {
            Self::Release
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file-level artifact category, with its store directory and extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Certificate,
    PrivateKey,
    Profile,
    Keystore,
    SupplyKey,
}

impl ArtifactKind {
    /// Top-level store directory.
    pub fn dir(&self) -> &'static str {
        match self {
            Self::Certificate | Self::PrivateKey => "certs",
            Self::Profile => "profiles",
            Self::Keystore => "keystores",
            Self::SupplyKey => "supply",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Certificate => "cer",
            Self::PrivateKey => "p12",
            Self::Profile => "mobileprovision",
            Self::Keystore => "keystore",
            Self::SupplyKey => "supply",
        }
    }
}

/// A credential kind as reconciled and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    Certificate,
    Profile,
    Keystore,
    SupplyKey,
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Certificate => "code signing identity",
            Self::Profile => "provisioning profile",
            Self::Keystore => "keystore",
            Self::SupplyKey => "supply key",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!("appstore".parse::<Environment>().unwrap(), Environment::Appstore);
        assert_eq!("debug".parse::<Environment>().unwrap(), Environment::Debug);

        let err = "production".parse::<Environment>().unwrap_err();
        assert!(err.contains("unsupported environment production"));
        assert!(err.contains("appstore, adhoc, development, enterprise"));
    }

    #[test]
    fn test_cert_type_for_environment() {
        assert_eq!(
            CertType::for_environment(Environment::Development, false),
            CertType::Development
        );
        assert_eq!(
            CertType::for_environment(Environment::Appstore, false),
            CertType::Distribution
        );
        assert_eq!(
            CertType::for_environment(Environment::Adhoc, true),
            CertType::Distribution
        );
        assert_eq!(
            CertType::for_environment(Environment::Enterprise, false),
            CertType::Distribution
        );
        assert_eq!(
            CertType::for_environment(Environment::Enterprise, true),
            CertType::Enterprise
        );
    }

    #[test]
    fn test_profile_file_stem() {
        let stem = ProfileType::AppStore.file_stem("tools.fastlane.app");
        assert_eq!(stem, "AppStore_tools.fastlane.app");
        assert_eq!(ProfileType::Enterprise.type_name(), "InHouse");
        assert_eq!(ProfileType::for_environment(Environment::Release), None);
    }

    #[test]
    fn test_key_type_defaults_to_release() {
        assert_eq!(KeyType::for_environment(Environment::Debug), KeyType::Debug);
        assert_eq!(KeyType::for_environment(Environment::Release), KeyType::Release);
        assert_eq!(KeyType::for_environment(Environment::Development), KeyType::Release);
    }

    #[test]
    fn test_artifact_layout() {
        assert_eq!(ArtifactKind::Certificate.dir(), ArtifactKind::PrivateKey.dir());
        assert_eq!(ArtifactKind::Profile.extension(), "mobileprovision");
        assert_eq!(ArtifactKind::SupplyKey.dir(), "supply");
    }
}
