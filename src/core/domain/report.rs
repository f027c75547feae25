//! Run summary handed to the presentation layer.

use std::path::PathBuf;

use super::{Environment, Reconciliation};
use crate::core::types::{AppIdentifier, ProfileUuid};

/// What happened at the commit step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Nothing was written to the store.
    SkippedNoChanges,
    /// Changes were made but readonly forbids pushing them.
    SkippedReadOnly,
    Committed { message: String },
}

/// Structured result of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub app_identifier: Option<AppIdentifier>,
    pub environment: Environment,
    pub profile_uuid: Option<ProfileUuid>,
    pub reconciliations: Vec<Reconciliation>,
    /// Files copied out of the store for the Android path.
    pub exported: Vec<PathBuf>,
    pub commit: CommitOutcome,
}

impl RunReport {
    /// Environment variable build tooling reads the profile UUID from,
    /// e.g. `sigh_tools.fastlane.app_appstore`.
    pub fn environment_variable_name(&self) -> Option<String> {
        self.app_identifier
            .as_ref()
            .map(|app| environment_variable_name(app, self.environment))
    }
}

/// Environment variable name for an app and environment.
pub fn environment_variable_name(app_identifier: &str, environment: Environment) -> String {
    format!("sigh_{}_{}", app_identifier, environment)
}
