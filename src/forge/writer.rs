//! Forge write operations for new projects.
//!
//! "Do X": Create a remote repository and push the initial commit.
//!
//! # Example
//!
//! ```ignore
//! use sprout::forge::{ForgeWriter, GitHubWriter};
//!
//! let writer = GitHubWriter;
//! if writer.is_available() {
//!     let url = writer.create_repo(&repo, Path::new("demo"))?;
//!     println!("Pushed to: {}", url);
//! }
//! ```

use anyhow::{bail, Result};
use std::path::Path;

use super::NewRepo;
use crate::process::{self, command};

/// Write operations on a forge platform.
///
/// Each method is designed to work with the platform's CLI tool.
pub trait ForgeWriter {
    /// Platform name for status lines.
    fn name(&self) -> &str;

    /// Whether this writer targets a forge at all.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Whether the platform CLI is installed.
    fn is_available(&self) -> bool;

    /// Get the current authenticated username.
    fn current_user(&self) -> Result<String>;

    /// Create `repo` from the local repository at `repo_path`, add it as
    /// `origin`, and push `repo.branch`.
    ///
    /// Returns the repository URL.
    fn create_repo(&self, repo: &NewRepo, repo_path: &Path) -> Result<String>;
}

/// GitHub implementation of ForgeWriter.
///
/// Uses `gh` CLI for all operations. Authentication is handled by `gh auth login`.
pub struct GitHubWriter;

impl ForgeWriter for GitHubWriter {
    fn name(&self) -> &str {
        "GitHub"
    }

    fn is_available(&self) -> bool {
        which::which("gh").is_ok()
    }

    fn current_user(&self) -> Result<String> {
        let cwd = std::env::temp_dir();
        let output = process::run(
            command("gh", &cwd).args(["api", "user", "--jq", ".login"]),
            "gh api user",
        )?;
        Ok(process::stdout(&output))
    }

    fn create_repo(&self, repo: &NewRepo, repo_path: &Path) -> Result<String> {
        // `gh repo create --push` pushes the current branch
        let output = process::run(
            command("gh", repo_path).args([
                "repo",
                "create",
                &repo.name,
                repo.visibility.flag(),
                "--description",
                &repo.description,
                "--source=.",
                "--remote=origin",
                "--push",
            ]),
            "gh repo create",
        )?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if let Some(url) = stdout.lines().map(str::trim).find(|l| l.starts_with("https://")) {
            return Ok(url.to_string());
        }

        let user = self.current_user()?;
        Ok(format!("https://github.com/{}/{}", user, repo.name))
    }
}

/// Null implementation for runs without a forge.
///
/// Reports itself disabled, so the remote step is skipped.
pub struct NoneWriter;

impl ForgeWriter for NoneWriter {
    fn name(&self) -> &str {
        "none"
    }

    fn is_enabled(&self) -> bool {
        false
    }

    fn is_available(&self) -> bool {
        false
    }

    fn current_user(&self) -> Result<String> {
        bail!("No forge configured - cannot get current user")
    }

    fn create_repo(&self, _repo: &NewRepo, _repo_path: &Path) -> Result<String> {
        bail!("No forge configured - cannot create repository")
    }
}
