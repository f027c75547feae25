//! Matchbook - share code signing identities through an encrypted git repository.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use matchbook::cli::{execute, hint, output, Cli};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("MATCHBOOK_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("matchbook=debug")
        } else {
            EnvFilter::new("matchbook=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .init();

    if let Err(e) = execute(cli) {
        output::error(&e.to_string());
        if let Some(hint) = hint::for_error(&e) {
            output::hint(&hint);
        }
        std::process::exit(1);
    }
}
