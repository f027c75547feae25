//! Reconciliation results.

use std::fmt;
use std::path::PathBuf;

use super::CredentialKind;

/// Where a credential kind ended up after reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Found in the store and installed.
    Reused,
    /// Created through the generation collaborator and written to the store.
    Generated,
    /// Neither found nor created; the run stopped here.
    Failed,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Reused => "reused",
            Self::Generated => "generated",
            Self::Failed => "failed",
        })
    }
}

/// The result of reconciling one credential kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub kind: CredentialKind,
    pub subtype: String,
    pub state: State,
    /// Artifact in the store, absent when the kind failed.
    pub path: Option<PathBuf>,
}

impl Reconciliation {
    pub fn reused(kind: CredentialKind, subtype: impl Into<String>, path: PathBuf) -> Self {
        Self::settled(kind, subtype, State::Reused, Some(path))
    }

    pub fn generated(kind: CredentialKind, subtype: impl Into<String>, path: PathBuf) -> Self {
        Self::settled(kind, subtype, State::Generated, Some(path))
    }

    pub fn failed(kind: CredentialKind, subtype: impl Into<String>) -> Self {
        Self::settled(kind, subtype, State::Failed, None)
    }

    fn settled(
        kind: CredentialKind,
        subtype: impl Into<String>,
        state: State,
        path: Option<PathBuf>,
    ) -> Self {
        Self {
            kind,
            subtype: subtype.into(),
            state,
            path,
        }
    }
}
