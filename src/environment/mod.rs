//! Isolated runtime environments.
//!
//! The pipeline only talks to [`EnvironmentProvider`]; the interpreter's
//! `venv` module is the production implementation.

mod venv;

pub use venv::VenvProvider;

use anyhow::Result;
use std::path::Path;

/// Creates an isolated environment and installs packages into it.
pub trait EnvironmentProvider {
    /// Human-readable name for status lines
    fn name(&self) -> &str;

    /// Create the environment at `env_path`. The parent directory exists.
    fn create(&self, env_path: &Path) -> Result<()>;

    /// Install `packages` into the environment at `env_path`.
    fn install(&self, env_path: &Path, packages: &[String]) -> Result<()>;
}
