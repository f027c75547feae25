//! Provisioning profile metadata.
//!
//! A `.mobileprovision` file is a CMS signed blob wrapping an XML property
//! list. Only the plist is read; the signature is not verified.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::core::types::ProfileUuid;
use crate::error::{ReconcileError, Result};

const PLIST_START: &[u8] = b"<?xml";
const PLIST_END: &[u8] = b"</plist>";

/// The fields of a provisioning profile the engine cares about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProvisioningProfile {
    #[serde(rename = "UUID")]
    pub uuid: ProfileUuid,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "TeamIdentifier", default)]
    pub team_identifier: Vec<String>,
    #[serde(rename = "ProvisionedDevices", default)]
    pub provisioned_devices: Vec<String>,
}

impl ProvisioningProfile {
    /// Parse a profile file.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::InvalidProfile` when no plist is embedded or
    /// it lacks a UUID.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let profile = Self::parse(&bytes).map_err(|reason| ReconcileError::InvalidProfile {
            path: path.to_path_buf(),
            reason,
        })?;
        debug!(path = %path.display(), uuid = %profile.uuid, "parsed provisioning profile");
        Ok(profile)
    }

    /// Parse the plist embedded in raw profile bytes.
    pub fn parse(bytes: &[u8]) -> std::result::Result<Self, String> {
        let start = find(bytes, PLIST_START).ok_or("no property list found")?;
        let end = find(&bytes[start..], PLIST_END)
            .map(|i| start + i + PLIST_END.len())
            .ok_or("unterminated property list")?;

        plist::from_bytes(&bytes[start..end]).map_err(|e| e.to_string())
    }

    /// Number of devices the profile was issued for.
    pub fn device_count(&self) -> usize {
        self.provisioned_devices.len()
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
