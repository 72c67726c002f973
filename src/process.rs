//! Spawning external tools.
//!
//! Every provider goes through here so each invocation is logged with its
//! working directory and failures carry the tool's stderr.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::{Command, Output};

/// Build a command that runs in `cwd`.
pub(crate) fn command(program: impl AsRef<std::ffi::OsStr>, cwd: &Path) -> Command {
    let mut cmd = Command::new(program);
    cmd.current_dir(cwd);
    cmd
}

/// Run `cmd` to completion and fail on a nonzero exit.
///
/// `what` names the operation in error messages, e.g. "git commit".
pub(crate) fn run(cmd: &mut Command, what: &str) -> Result<Output> {
    tracing::debug!(
        program = %cmd.get_program().to_string_lossy(),
        args = ?cmd.get_args().collect::<Vec<_>>(),
        cwd = ?cmd.get_current_dir(),
        "running {what}"
    );

    let output = cmd
        .output()
        .with_context(|| format!("Failed to run `{what}`"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = stderr.trim();
        tracing::debug!(status = ?output.status.code(), stderr = %detail, "{what} failed");
        if detail.is_empty() {
            bail!("`{what}` exited with {}", output.status);
        }
        bail!("`{what}` failed: {detail}");
    }

    Ok(output)
}

/// Trimmed stdout of a successful run.
pub(crate) fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
