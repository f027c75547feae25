//! Import command.

use std::path::PathBuf;

use crate::cli::{load_config, output, prompt, summary, StoreArgs};
use crate::core::cipher::OpenSsl;
use crate::core::generator::Fastlane;
use crate::core::git::Git;
use crate::core::installer::System;
use crate::core::manual::ManualImport;
use crate::core::pipeline::{self, Collaborators};
use crate::error::Result;

/// Put existing files into the store.
pub fn execute(
    store: StoreArgs,
    cert: Option<PathBuf>,
    p12: Option<PathBuf>,
    profile: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let mut config = load_config(verbose)?;
    store.apply(&mut config);
    config.validate()?;

    let files = ManualImport { cert, p12, profile };
    files.validate()?;

    Git::check()?;
    OpenSsl::check()?;

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

    let report = pipeline::import(&config, &collab, &files)?;

    summary::report(&report);
    output::success("Given certificates and profiles have been put in the store");
    Ok(())
}
