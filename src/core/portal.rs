//! Read-only queries against the developer portal.
//!
//! matchbook ships no portal client; callers that have one plug it in here.
//! Without a portal, pre-flight checks and device-count comparisons are
//! skipped.

use crate::core::domain::{CertType, Platform};
use crate::error::Result;

/// Questions the reconciliation engine asks the portal.
pub trait Portal {
    /// Whether an App ID is registered.
    fn bundle_identifier_exists(&self, app_identifier: &str, platform: Platform) -> Result<bool>;

    /// Whether a certificate is still valid on the portal.
    fn certificate_exists(&self, cert_type: CertType, certificate_id: &str) -> Result<bool>;

    /// Whether a profile with this UUID exists on the portal.
    fn profile_exists(&self, uuid: &str) -> Result<bool>;

    /// Number of devices registered for a platform.
    fn device_count(&self, platform: Platform) -> Result<usize>;
}

impl<P: Portal + ?Sized> Portal for &P {
    fn bundle_identifier_exists(&self, app_identifier: &str, platform: Platform) -> Result<bool> {
        (**self).bundle_identifier_exists(app_identifier, platform)
    }

    fn certificate_exists(&self, cert_type: CertType, certificate_id: &str) -> Result<bool> {
        (**self).certificate_exists(cert_type, certificate_id)
    }

    fn profile_exists(&self, uuid: &str) -> Result<bool> {
        (**self).profile_exists(uuid)
    }

    fn device_count(&self, platform: Platform) -> Result<usize> {
        (**self).device_count(platform)
    }
}
