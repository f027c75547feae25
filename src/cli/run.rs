//! Run command.
//!
//! Clones the store, reconciles it against the configuration and installs
//! everything locally.

use tracing::info;

use crate::cli::{load_config, output, prompt, summary, RunArgs};
use crate::core::cipher::OpenSsl;
use crate::core::generator::Fastlane;
use crate::core::git::Git;
use crate::core::installer::System;
use crate::core::pipeline::{self, Collaborators};
use crate::error::Result;

/// Execute the run command.
pub fn execute(args: RunArgs, verbose: bool) -> Result<()> {
    let mut config = load_config(verbose)?;
    args.apply(&mut config);
    config.validate()?;

    Git::check()?;
    OpenSsl::check()?;

    summary::options(&config);
    if config.force_for_new_devices && !config.android {
        output::warn("no developer portal access configured, device counts can't be compared");
    }

    let passphrases = prompt::passphrases();
    let installer = System::new()?;
    let collab = Collaborators {
        vcs: &Git,
        cipher: &OpenSsl,
        generator: &Fastlane,
        installer: &installer,
        portal: None,
        passphrases: &passphrases,
    };

    info!(remote = %config.git_url, "starting run");
    let mut progress = Vec::new();
    let report = pipeline::run_tracked(&config, &collab, &mut progress).map_err(|e| {
        summary::reconciliations(&progress);
        e
    })?;

    summary::report(&report);
    output::success("All required keys, certificates and provisioning profiles are installed");
    Ok(())
}
