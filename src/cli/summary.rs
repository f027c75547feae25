//! Run summaries.

use crate::cli::output;
use crate::core::config::Config;
use crate::core::domain::{CommitOutcome, Reconciliation, RunReport, State};

const LABEL_WIDTH: usize = 20;

/// Print the options a run starts with. Secrets are never shown.
pub fn options(config: &Config) {
    output::section(&format!("Summary for matchbook {}", env!("CARGO_PKG_VERSION")));
    output::kv("git_url", &config.git_url, LABEL_WIDTH);
    output::kv("git_branch", &config.git_branch, LABEL_WIDTH);
    output::kv("type", config.environment, LABEL_WIDTH);
    if let Some(app) = &config.app_identifier {
        output::kv("app_identifier", app, LABEL_WIDTH);
    }
    if let Some(username) = &config.username {
        output::kv("username", username, LABEL_WIDTH);
    }
    if let Some(team_id) = &config.team_id {
        output::kv("team_id", team_id, LABEL_WIDTH);
    }
    if config.android {
        output::kv("android", if config.supply { "supply" } else { "keystore" }, LABEL_WIDTH);
    } else {
        output::kv("platform", config.platform, LABEL_WIDTH);
        output::kv("keychain_name", &config.keychain_name, LABEL_WIDTH);
    }
    output::kv("readonly", config.readonly, LABEL_WIDTH);
    output::kv("shallow_clone", config.shallow_clone, LABEL_WIDTH);
    if config.force || config.force_for_new_devices {
        output::kv("force", config.force, LABEL_WIDTH);
        output::kv("force_for_new_devices", config.force_for_new_devices, LABEL_WIDTH);
    }
    println!();
}

/// Print what a run did.
pub fn report(report: &RunReport) {
    if let Some(uuid) = &report.profile_uuid {
        output::section("Installed Provisioning Profile");
        if let Some(app) = &report.app_identifier {
            output::kv("App Identifier", app, LABEL_WIDTH);
        }
        output::kv("Type", report.environment, LABEL_WIDTH);
        output::kv("UUID", uuid, LABEL_WIDTH);
        if let Some(name) = report.environment_variable_name() {
            output::kv("Environment Variable", name, LABEL_WIDTH);
        }
    }

    reconciliations(&report.reconciliations);

    for path in &report.exported {
        output::success(&format!("put decrypted file to {}", output::path(path.display())));
    }

    println!();
    match &report.commit {
        CommitOutcome::Committed { message } => output::success(&format!("pushed \"{}\"", message)),
        CommitOutcome::SkippedReadOnly => output::warn("changes were not pushed because readonly is enabled"),
        CommitOutcome::SkippedNoChanges => output::dimmed("store unchanged"),
    }
}

/// Print the per-kind results, e.g. of a run that stopped early.
pub fn reconciliations(reconciliations: &[Reconciliation]) {
    if reconciliations.is_empty() {
        return;
    }
    output::section("Reconciliation");
    for r in reconciliations {
        let label = format!("{} ({})", r.kind, r.subtype);
        let state = match r.state {
            State::Generated => format!("{} {}", r.state, marker(r.path.as_deref())),
            _ => r.state.to_string(),
        };
        output::kv(&label, state.trim_end(), 36);
    }
}

fn marker(path: Option<&std::path::Path>) -> String {
    path.and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
