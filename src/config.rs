//! User configuration stored in `~/.sprout/config.toml`.
//!
//! All sections are optional with defaults, so a missing file and an empty
//! file behave the same. Command-line flags override these values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::forge::Visibility;
use crate::paths;

/// Dependency the generated entry point imports.
pub const REQUIRED_PACKAGE: &str = "python-dotenv";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub python: PythonSection,
    #[serde(default)]
    pub dependencies: DependenciesSection,
    #[serde(default)]
    pub git: GitSection,
    #[serde(default)]
    pub remote: RemoteSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PythonSection {
    /// Interpreter used to create the environment (name on PATH or a path)
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    /// Environment directory name inside the project
    #[serde(default = "default_env_dir")]
    pub env_dir: String,
}

fn default_interpreter() -> String {
    if cfg!(windows) {
        "python".to_string()
    } else {
        "python3".to_string()
    }
}
fn default_env_dir() -> String {
    paths::project::DEFAULT_ENV_DIR.to_string()
}

impl Default for PythonSection {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            env_dir: default_env_dir(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DependenciesSection {
    /// Packages installed after the required one
    #[serde(default)]
    pub extra: Vec<String>,
    /// Treat a failed install as fatal and roll the project back
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitSection {
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default = "default_commit_message")]
    pub commit_message: String,
}

fn default_branch() -> String {
    "main".to_string()
}
fn default_commit_message() -> String {
    "Initial commit".to_string()
}

impl Default for GitSection {
    fn default() -> Self {
        Self {
            branch: default_branch(),
            commit_message: default_commit_message(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RemoteSection {
    #[serde(default)]
    pub policy: RemotePolicy,
    #[serde(default)]
    pub visibility: Visibility,
}

/// How the remote hosting step decides whether to run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RemotePolicy {
    /// Prompt the operator (answers no when stdin is not a terminal)
    #[default]
    Ask,
    /// Create and push without prompting
    Always,
    /// Skip the step entirely
    Never,
}

impl Config {
    /// Load from `$SPROUT_CONFIG` or `~/.sprout/config.toml`.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Load from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Full install list: the required package, then extras, without duplicates.
    pub fn packages(&self) -> Vec<String> {
        let mut packages = vec![REQUIRED_PACKAGE.to_string()];
        for pkg in &self.dependencies.extra {
            let pkg = pkg.trim();
            if !pkg.is_empty() && !packages.iter().any(|p| p == pkg) {
                packages.push(pkg.to_string());
            }
        }
        packages
    }
}
