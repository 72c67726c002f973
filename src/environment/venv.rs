use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

use super::EnvironmentProvider;
use crate::paths;
use crate::process;

/// `python -m venv` plus `pip install` inside the new environment.
pub struct VenvProvider {
    interpreter: String,
}

impl VenvProvider {
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    /// Expand `~`/`$VAR` and look the interpreter up on PATH.
    pub fn resolve_interpreter(&self) -> Result<PathBuf> {
        let expanded = shellexpand::full(&self.interpreter)
            .with_context(|| format!("Failed to expand interpreter '{}'", self.interpreter))?;

        which::which(expanded.as_ref()).map_err(|_| {
            anyhow!(
                "Python interpreter '{}' not found. Install Python 3 or pass --python <path>",
                self.interpreter
            )
        })
    }
}

impl EnvironmentProvider for VenvProvider {
    fn name(&self) -> &str {
        "venv"
    }

    fn create(&self, env_path: &Path) -> Result<()> {
        let python = self.resolve_interpreter()?;
        let cwd = env_path.parent().unwrap_or(env_path);

        process::run(
            process::command(&python, cwd)
                .args(["-m", "venv"])
                .arg(env_path),
            "python -m venv",
        )?;

        // venv can exit 0 without pip (e.g. ensurepip missing on some distros)
        let env_python = paths::env::python(env_path);
        if !env_python.exists() {
            anyhow::bail!(
                "Environment created but {} is missing",
                env_python.display()
            );
        }
        Ok(())
    }

    fn install(&self, env_path: &Path, packages: &[String]) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }
        let cwd = env_path.parent().unwrap_or(env_path);

        process::run(
            process::command(paths::env::python(env_path), cwd)
                .args([
                    "-m",
                    "pip",
                    "install",
                    "--quiet",
                    "--disable-pip-version-check",
                ])
                .args(packages),
            "pip install",
        )?;
        Ok(())
    }
}
