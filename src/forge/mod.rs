//! Remote hosting for new projects.
//!
//! "Do X": Publish a freshly committed project to a forge platform.
//!
//! # Design
//!
//! - **ForgeWriter**: probe for the platform CLI, create a repository and push
//! - **GitHubWriter**: `gh` CLI
//! - **NoneWriter**: always absent (used with `--local`)
//!
//! When creation fails the operator gets the exact commands to finish by hand
//! (see [`manual_instructions`]).

mod types;
pub mod writer;

pub use types::*;
pub use writer::{ForgeWriter, GitHubWriter, NoneWriter};

use chrono::NaiveDate;
use std::path::Path;

/// One-line description for the remote repository.
pub fn description(name: &str, created: NaiveDate) -> String {
    format!("{} - Python project created {}", name, created.format("%Y-%m-%d"))
}

/// Commands that link and push the project by hand after a failed create.
///
/// `user` falls back to a placeholder when the forge login is unknown.
pub fn manual_instructions(
    project_path: &Path,
    name: &str,
    user: Option<&str>,
    branch: &str,
) -> Vec<String> {
    let owner = user.unwrap_or("<your-username>");
    vec![
        format!("cd {}", project_path.display()),
        format!("git remote add origin git@github.com:{}/{}.git", owner, name),
        format!("git push -u origin {}", branch),
    ]
}
