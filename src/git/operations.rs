//! Low-level git operations.
//!
//! Every function takes the repository path explicitly; nothing here depends
//! on the process working directory.

use anyhow::{Context, Result};
use std::path::Path;

use crate::process::{self, command};

/// Check if `repo` is inside a git repository
pub fn is_git_repo(repo: &Path) -> Result<bool> {
    let output = command("git", repo)
        .args(["rev-parse", "--git-dir"])
        .output()
        .context("Failed to check if directory is a git repository")?;

    Ok(output.status.success())
}

/// Initialize a repository whose first branch is `branch`
pub fn init(repo: &Path, branch: &str) -> Result<()> {
    let with_branch = process::run(
        command("git", repo).args(["init", "--initial-branch", branch]),
        "git init",
    );

    if with_branch.is_ok() {
        return Ok(());
    }

    // git < 2.28 has no --initial-branch; point HEAD at the branch by hand
    tracing::debug!("git init --initial-branch unsupported, falling back");
    process::run(command("git", repo).arg("init"), "git init")?;
    process::run(
        command("git", repo).args(["symbolic-ref", "HEAD", &format!("refs/heads/{}", branch)]),
        "git symbolic-ref HEAD",
    )?;
    Ok(())
}

/// Stage everything under `repo`
pub fn add_all(repo: &Path) -> Result<()> {
    process::run(command("git", repo).args(["add", "--all"]), "git add")?;
    Ok(())
}

/// Create a commit
pub fn commit(repo: &Path, message: &str) -> Result<()> {
    process::run(
        command("git", repo).args(["commit", "--quiet", "-m", message]),
        "git commit",
    )?;
    Ok(())
}

/// Get the current branch name
pub fn current_branch(repo: &Path) -> Result<String> {
    let output = process::run(
        command("git", repo).args(["symbolic-ref", "--short", "HEAD"]),
        "git symbolic-ref",
    )?;
    Ok(process::stdout(&output))
}

/// Count commits reachable from HEAD (0 for an unborn branch)
pub fn commit_count(repo: &Path) -> Result<usize> {
    let output = command("git", repo)
        .args(["rev-list", "--count", "HEAD"])
        .output()
        .context("Failed to count commits")?;

    if !output.status.success() {
        return Ok(0);
    }

    let count_str = String::from_utf8_lossy(&output.stdout).trim().to_string();
    count_str.parse().context("Failed to parse commit count")
}

/// Get last commit message
pub fn last_commit_message(repo: &Path) -> Result<String> {
    let output = process::run(
        command("git", repo).args(["log", "-1", "--format=%s"]),
        "git log",
    )?;
    Ok(process::stdout(&output))
}
