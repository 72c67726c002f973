//! Version control for new projects.
//!
//! Handles:
//! - Repository initialization on a named first branch
//! - Staging and the initial commit
//!
//! The pipeline depends on [`VersionControl`]; [`GitCli`] drives the `git`
//! binary through the path-explicit functions in `operations`.

mod operations;

pub use operations::{
    add_all, commit, commit_count, current_branch, init, is_git_repo, last_commit_message,
};

use anyhow::Result;
use std::path::Path;

/// Version control operations the pipeline needs.
pub trait VersionControl {
    /// Create a repository in `repo` whose first branch is `branch`.
    fn init(&self, repo: &Path, branch: &str) -> Result<()>;

    /// Stage every file in `repo`.
    fn stage_all(&self, repo: &Path) -> Result<()>;

    /// Commit staged files.
    fn commit(&self, repo: &Path, message: &str) -> Result<()>;
}

/// `git` on PATH.
pub struct GitCli;

impl VersionControl for GitCli {
    fn init(&self, repo: &Path, branch: &str) -> Result<()> {
        if which::which("git").is_err() {
            anyhow::bail!("git not found on PATH");
        }
        operations::init(repo, branch)
    }

    fn stage_all(&self, repo: &Path) -> Result<()> {
        operations::add_all(repo)
    }

    fn commit(&self, repo: &Path, message: &str) -> Result<()> {
        operations::commit(repo, message)
    }
}
