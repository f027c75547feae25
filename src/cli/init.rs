//! Init command.
//!
//! Writes a `.matchbook.toml` so later commands don't need the store URL on
//! every invocation.

use tracing::info;

use crate::cli::output;
use crate::core::config::Config;
use crate::core::domain::Environment;
use crate::error::Result;

/// Write `.matchbook.toml` in the current directory.
pub fn execute(
    git_url: String,
    environment: Option<Environment>,
    app_identifier: Option<String>,
) -> Result<()> {
    let mut config = Config::new(git_url);
    if let Some(environment) = environment {
        config.environment = environment;
    }
    config.app_identifier = app_identifier;

    let cwd = std::env::current_dir()?;
    let path = config.save_new(&cwd)?;
    info!(path = %path.display(), "wrote config");

    output::success(&format!("created {}", output::path(path.display())));
    output::hint(&format!(
        "run: {} to fetch your certificates and profiles",
        output::cmd("matchbook run")
    ));
    Ok(())
}
