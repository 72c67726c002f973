//! Provisioning pipeline for a new project
//!
//! Public interface in this file; step implementations live in `steps`.
//!
//! # Process
//!
//! 1. **Project Root**: created create-only; an existing directory is a conflict
//! 2. **Environment**: isolated runtime inside the root
//! 3. **Dependencies**: required package plus extras (warning unless strict)
//! 4. **Boilerplate**: entry point, secrets template, ignore rules
//! 5. **Version control**: init on `main`, stage, commit (warning on failure)
//! 6. **Remote**: optional, gated on commit + CLI present + operator opt-in
//! 7. **Report**: absolute path and next commands
//!
//! Any fatal failure after step 1 unwinds the compensation stack, which
//! removes the Project Root.
//!
//! # Example
//!
//! ```no_run
//! use sprout::environment::VenvProvider;
//! use sprout::forge::GitHubWriter;
//! use sprout::git::GitCli;
//! use sprout::pipeline::{provision, Providers, ProvisionOptions};
//! use sprout::prompt::StdinPrompter;
//!
//! let venv = VenvProvider::new("python3");
//! let providers = Providers {
//!     environment: &venv,
//!     vcs: &GitCli,
//!     forge: &GitHubWriter,
//!     prompter: &StdinPrompter,
//! };
//! let report = provision("demo", &providers, &ProvisionOptions::default())?;
//! println!("{}", report.project_root.display());
//! # Ok::<(), sprout::ProvisionError>(())
//! ```

mod rollback;
mod steps;

pub use rollback::CompensationStack;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{Config, RemotePolicy};
use crate::environment::EnvironmentProvider;
use crate::error::ProvisionError;
use crate::forge::{ForgeWriter, Visibility};
use crate::git::VersionControl;
use crate::prompt::Prompter;

/// External collaborators the pipeline drives.
pub struct Providers<'a> {
    pub environment: &'a dyn EnvironmentProvider,
    pub vcs: &'a dyn VersionControl,
    pub forge: &'a dyn ForgeWriter,
    pub prompter: &'a dyn Prompter,
}

/// Per-run settings, resolved from config and command-line flags.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionOptions {
    /// Environment directory name inside the project
    pub env_dir: String,
    /// Packages to install, required one first
    pub packages: Vec<String>,
    /// Dependency install failure is fatal (with rollback)
    pub strict_deps: bool,
    pub branch: String,
    pub commit_message: String,
    pub remote_policy: RemotePolicy,
    pub visibility: Visibility,
}

impl ProvisionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            env_dir: config.python.env_dir.clone(),
            packages: config.packages(),
            strict_deps: config.dependencies.strict,
            branch: config.git.branch.clone(),
            commit_message: config.git.commit_message.clone(),
            remote_policy: config.remote.policy,
            visibility: config.remote.visibility,
        }
    }
}

impl Default for ProvisionOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Pipeline steps, for warnings and status lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CreateRoot,
    CreateEnvironment,
    InstallDependencies,
    WriteBoilerplate,
    VersionControl,
    RemoteHosting,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::CreateRoot => "create project directory",
            Step::CreateEnvironment => "create environment",
            Step::InstallDependencies => "install dependencies",
            Step::WriteBoilerplate => "write boilerplate",
            Step::VersionControl => "initial commit",
            Step::RemoteHosting => "remote repository",
        };
        f.write_str(name)
    }
}

/// A failed step the run continued past.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub step: Step,
    pub message: String,
}

/// Why the remote step did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The initial commit failed
    NotCommitted,
    /// Remote policy is `never`, or no forge is configured
    Disabled,
    /// The forge CLI is not installed
    CliMissing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    Skipped(SkipReason),
    /// Operator answered no
    Declined,
    /// Created and pushed; holds the repository URL
    Created(String),
    /// Creation or push failed; holds the error message
    Failed(String),
}

/// Result of a run that reached completion.
#[derive(Debug, Clone)]
pub struct ProvisionReport {
    /// Absolute path of the Project Root
    pub project_root: PathBuf,
    pub env_path: PathBuf,
    pub warnings: Vec<Warning>,
    pub committed: bool,
    pub remote: RemoteOutcome,
}

impl ProvisionReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Reject names that cannot be a fresh directory under the working directory.
pub fn validate_name(name: &str) -> Result<&str, ProvisionError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ProvisionError::Usage(
            "Project name must not be empty".to_string(),
        ));
    }
    if trimmed == "." || trimmed == ".." || trimmed.contains(|c: char| c == '/' || c == '\\') {
        return Err(ProvisionError::Usage(format!(
            "Project name '{}' must be a plain directory name",
            name
        )));
    }
    if trimmed != name {
        return Err(ProvisionError::Usage(format!(
            "Project name '{}' has leading or trailing whitespace",
            name
        )));
    }
    Ok(name)
}

/// Reject environment directory names that would land outside the Project Root.
pub fn validate_env_dir(env_dir: &str) -> Result<&str, ProvisionError> {
    let plain = !env_dir.trim().is_empty()
        && env_dir.trim() == env_dir
        && env_dir != "."
        && env_dir != ".."
        && !env_dir.contains(|c: char| c == '/' || c == '\\');
    if !plain {
        return Err(ProvisionError::Usage(format!(
            "Environment directory '{}' must be a plain directory name inside the project",
            env_dir
        )));
    }
    Ok(env_dir)
}

/// Provision `name` under the current working directory.
pub fn provision(
    name: &str,
    providers: &Providers<'_>,
    options: &ProvisionOptions,
) -> Result<ProvisionReport, ProvisionError> {
    let name = validate_name(name)?;
    let base = std::env::current_dir().map_err(|source| ProvisionError::RootCreation {
        path: PathBuf::from(name),
        source,
    })?;
    provision_in(&base, name, providers, options)
}

/// Provision `name` under `base_dir`.
///
/// Every step receives explicit paths; the process working directory is never
/// changed.
pub fn provision_in(
    base_dir: &Path,
    name: &str,
    providers: &Providers<'_>,
    options: &ProvisionOptions,
) -> Result<ProvisionReport, ProvisionError> {
    let name = validate_name(name)?;
    validate_env_dir(&options.env_dir)?;
    steps::run(base_dir, name, providers, options)
}
