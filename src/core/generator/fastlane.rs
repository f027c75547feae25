//! Generator backed by the fastlane `cert` and `sigh` tools and `keytool`.
//!
//! ## Requirements
//!
//! - `fastlane` for certificates and provisioning profiles
//! - `keytool` (any JDK) for Android keystores

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde::Deserialize;
use tracing::{debug, info};

use super::{classify_failure, profile_name, random_stem, Generator};
use crate::core::config::Config;
use crate::core::domain::{CertType, CredentialKind, KeyType, ProfileType};
use crate::core::tool;
use crate::error::{ConfigError, GenerationError, Result};

/// Child environment variable carrying the keystore password to keytool.
const KEYSTORE_PASS_ENV: &str = "MATCHBOOK_KEYSTORE_PASSWORD";

/// The fields a Google service account key must have to be usable by supply.
#[derive(Deserialize)]
struct ServiceAccount {
    client_email: String,
    #[allow(dead_code)]
    private_key: String,
}

/// Generator shelling out to fastlane and keytool.
#[derive(Debug, Default, Clone, Copy)]
pub struct Fastlane;

impl Fastlane {
    fn invoke(&self, kind: CredentialKind, cmd: &mut Command) -> Result<()> {
        let out = tool::output("fastlane", cmd)?;
        if out.status.success() {
            return Ok(());
        }
        Err(classify_failure(kind, transcript(&out)).into())
    }
}

impl Generator for Fastlane {
    fn certificate(&self, config: &Config, cert_type: CertType, output_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(output_dir)?;
        let before = listing(output_dir, "cer");

        info!(%cert_type, "requesting a new certificate");
        let mut cmd = Command::new("fastlane");
        cmd.arg("cert")
            .arg("--output_path")
            .arg(output_dir)
            .arg("--force");
        if cert_type == CertType::Development {
            cmd.arg("--development");
        }
        portal_account_args(&mut cmd, config);
        self.invoke(CredentialKind::Certificate, &mut cmd)?;

        newest_since(output_dir, "cer", &before, CredentialKind::Certificate)
    }

    fn profile(
        &self,
        config: &Config,
        profile_type: ProfileType,
        certificate_id: &str,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        let app = config.app_identifier()?;
        fs::create_dir_all(output_dir)?;
        let filename = format!("{}.mobileprovision", profile_type.file_stem(app));

        info!(%profile_type, app, certificate_id, "requesting a new provisioning profile");
        let mut cmd = Command::new("fastlane");
        cmd.arg("sigh")
            .args(["--app_identifier", app])
            .arg("--output_path")
            .arg(output_dir)
            .args(["--filename", filename.as_str()])
            .args(["--cert_id", certificate_id])
            .args(["--provisioning_name", profile_name(profile_type, app, config).as_str()])
            .args(["--platform", config.platform.as_str()])
            .arg("--ignore_profiles_with_different_name")
            .arg("--force");
        match profile_type {
            ProfileType::AdHoc => {
                cmd.arg("--adhoc");
            }
            ProfileType::Development => {
                cmd.arg("--development");
            }
            ProfileType::AppStore | ProfileType::Enterprise => {}
        }
        portal_account_args(&mut cmd, config);
        self.invoke(CredentialKind::Profile, &mut cmd)?;

        let path = output_dir.join(filename);
        if !path.is_file() {
            return Err(GenerationError::NoOutput {
                kind: CredentialKind::Profile,
                dir: output_dir.to_path_buf(),
            }
            .into());
        }
        Ok(path)
    }

    fn keystore(&self, config: &Config, key_type: KeyType, output_dir: &Path) -> Result<PathBuf> {
        let password = config
            .keystore
            .password
            .as_deref()
            .ok_or(ConfigError::MissingField {
                field: "keystore_password",
            })?;
        let alias = config
            .keystore
            .alias
            .clone()
            .unwrap_or_else(|| key_type.as_str().to_string());
        let fullname = config
            .keystore
            .fullname
            .clone()
            .unwrap_or_else(whoami::realname);
        let city = config.keystore.city.as_deref().unwrap_or("Unknown");

        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(format!("{}.keystore", random_stem()));

        info!(%key_type, alias = %alias, "creating a new keystore");
        let mut cmd = Command::new("keytool");
        cmd.args(["-genkeypair", "-noprompt"])
            .arg("-keystore")
            .arg(&path)
            .args(["-alias", alias.as_str()])
            .args(["-keyalg", "RSA", "-keysize", "2048", "-validity", "10000"])
            .args(["-storepass:env", KEYSTORE_PASS_ENV])
            .args(["-keypass:env", KEYSTORE_PASS_ENV])
            .args(["-dname", distinguished_name(&fullname, city).as_str()])
            .env(KEYSTORE_PASS_ENV, password);

        let out = tool::output("keytool", &mut cmd)?;
        if !out.status.success() {
            return Err(GenerationError::Failed {
                kind: CredentialKind::Keystore,
                message: tool::failure_message(&out),
            }
            .into());
        }
        Ok(path)
    }

    fn supply_key(&self, config: &Config, key_type: KeyType, output_dir: &Path) -> Result<PathBuf> {
        let source = config
            .supply_json_import
            .as_deref()
            .ok_or(ConfigError::MissingField {
                field: "supply_json_import",
            })?;

        let contents = fs::read_to_string(source)?;
        let account: ServiceAccount =
            serde_json::from_str(&contents).map_err(|e| GenerationError::Failed {
                kind: CredentialKind::SupplyKey,
                message: format!("'{}' is not a service account key: {}", source.display(), e),
            })?;

        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(format!("{}.supply", random_stem()));
        fs::write(&path, contents)?;

        info!(%key_type, account = %account.client_email, "imported supply key");
        Ok(path)
    }
}

fn portal_account_args(cmd: &mut Command, config: &Config) {
    if let Some(username) = &config.username {
        cmd.args(["--username", username.as_str()]);
    }
    if let Some(team_id) = &config.team_id {
        cmd.args(["--team_id", team_id.as_str()]);
    }
    if let Some(team_name) = &config.team_name {
        cmd.args(["--team_name", team_name.as_str()]);
    }
}

fn distinguished_name(fullname: &str, city: &str) -> String {
    let escape = |s: &str| s.replace(',', "\\,");
    format!("CN={}, L={}", escape(fullname), escape(city))
}

/// Both output streams, for matching against known failure texts.
fn transcript(out: &Output) -> String {
    let stdout = String::from_utf8_lossy(&out.stdout);
    let stderr = String::from_utf8_lossy(&out.stderr);
    [stdout.trim(), stderr.trim()]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

fn listing(dir: &Path, extension: &str) -> BTreeSet<PathBuf> {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(extension))
                .collect()
        })
        .unwrap_or_default()
}

fn newest_since(
    dir: &Path,
    extension: &str,
    before: &BTreeSet<PathBuf>,
    kind: CredentialKind,
) -> Result<PathBuf> {
    let created: Vec<PathBuf> = listing(dir, extension).difference(before).cloned().collect();
    debug!(dir = %dir.display(), created = created.len(), "new files after generation");
    created.into_iter().last().ok_or_else(|| {
        GenerationError::NoOutput {
            kind,
            dir: dir.to_path_buf(),
        }
        .into()
    })
}
