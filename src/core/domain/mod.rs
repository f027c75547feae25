//! Domain types.

mod kind;
mod passphrase;
mod profile;
mod reconciliation;
mod report;

pub use kind::{
    ArtifactKind, CertType, CredentialKind, Environment, KeyType, Platform, ProfileType,
};
pub use passphrase::{Passphrase, PassphraseSource};
pub use profile::ProvisioningProfile;
pub use reconciliation::{Reconciliation, State};
pub use report::{environment_variable_name, CommitOutcome, RunReport};
