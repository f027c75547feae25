//! Running external command-line tools.

use std::io;
use std::process::{Command, Output};

use tracing::trace;

use crate::error::{Result, ToolError};

/// Run `cmd` and collect its output, whatever the exit status.
///
/// # Errors
///
/// Returns `ToolError::NotFound` when the binary is missing and
/// `ToolError::Spawn` for any other launch failure.
pub fn output(tool: &'static str, cmd: &mut Command) -> Result<Output> {
    trace!(tool, "spawning");
    cmd.output().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ToolError::NotFound(tool).into()
        } else {
            ToolError::Spawn { tool, source: e }.into()
        }
    })
}

/// Run `cmd` and return its stdout, requiring a zero exit status.
///
/// # Errors
///
/// Returns `ToolError::Failed` with the trimmed stderr (or stdout when stderr
/// is empty) on a non-zero exit.
pub fn run(tool: &'static str, cmd: &mut Command) -> Result<String> {
    let out = output(tool, cmd)?;
    if out.status.success() {
        return Ok(String::from_utf8_lossy(&out.stdout).into_owned());
    }

    trace!(tool, status = ?out.status.code(), "tool failed");
    Err(ToolError::Failed {
        tool,
        message: failure_message(&out),
    }
    .into())
}

/// The most useful text a failed tool left behind.
pub fn failure_message(out: &Output) -> String {
    let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
    if !stderr.is_empty() {
        return stderr;
    }
    let stdout = String::from_utf8_lossy(&out.stdout).trim().to_string();
    if !stdout.is_empty() {
        return stdout;
    }
    match out.status.code() {
        Some(code) => format!("exited with status {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Whether a binary can be found in PATH.
pub fn available(tool: &str) -> bool {
    which::which(tool).is_ok()
}
