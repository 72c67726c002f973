//! Single source of truth for every filesystem location sprout touches.
//!
//! This module defines WHERE things live. It has no I/O and no validation.
//!
//! # User-Level Paths (~/.sprout/)
//!
//! ```text
//! ~/.sprout/
//! └── config.toml              # User defaults (interpreter, packages, remote policy)
//! ```
//!
//! # Project-Level Paths ({root}/)
//!
//! ```text
//! {root}/
//! ├── venv/                    # Isolated runtime environment (name configurable)
//! │   └── bin/ | Scripts/      # Environment executables
//! ├── main.py                  # Entry point
//! ├── .env.example             # Secrets template
//! ├── .gitignore               # Ignore rules
//! └── .git/                    # Version control
//! ```

use std::path::{Path, PathBuf};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "SPROUT_CONFIG";

// =============================================================================
// User Level (~/.sprout/)
// =============================================================================

/// User's sprout home directory: `~/.sprout/`
pub fn sprout_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sprout")
}

/// User config file: `$SPROUT_CONFIG` or `~/.sprout/config.toml`
pub fn config_path() -> PathBuf {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => sprout_home().join("config.toml"),
    }
}

// =============================================================================
// Project Level ({root}/)
// =============================================================================

/// Project-level paths, relative to a project root.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use sprout::paths::project;
///
/// let root = Path::new("/home/user/demo");
/// assert_eq!(project::entry_point(root), Path::new("/home/user/demo/main.py"));
/// ```
pub mod project {
    use super::*;

    /// Entry point file name
    pub const ENTRY_POINT: &str = "main.py";
    /// Secrets template file name
    pub const ENV_TEMPLATE: &str = ".env.example";
    /// Ignore rules file name
    pub const GITIGNORE: &str = ".gitignore";

    /// Entry point: `{root}/main.py`
    pub fn entry_point(root: &Path) -> PathBuf {
        root.join(ENTRY_POINT)
    }

    /// Secrets template: `{root}/.env.example`
    pub fn env_template(root: &Path) -> PathBuf {
        root.join(ENV_TEMPLATE)
    }

    /// Ignore rules: `{root}/.gitignore`
    pub fn gitignore(root: &Path) -> PathBuf {
        root.join(GITIGNORE)
    }

    /// Git metadata: `{root}/.git/`
    pub fn git_dir(root: &Path) -> PathBuf {
        root.join(".git")
    }

    /// Environment directory name when none is configured
    pub const DEFAULT_ENV_DIR: &str = "venv";

    /// Isolated environment: `{root}/{env_dir}/`
    pub fn env_dir(root: &Path, env_dir: &str) -> PathBuf {
        root.join(env_dir)
    }
}

/// Paths inside an isolated environment.
///
/// Layout follows the interpreter's `venv` module: `bin/` on unix, `Scripts\`
/// on Windows.
pub mod env {
    use super::*;

    /// Executables directory name for this platform
    pub fn bin_dir_name() -> &'static str {
        if cfg!(windows) {
            "Scripts"
        } else {
            "bin"
        }
    }

    /// Executables directory: `{env}/bin/`
    pub fn bin_dir(env: &Path) -> PathBuf {
        env.join(bin_dir_name())
    }

    /// Environment interpreter: `{env}/bin/python`
    pub fn python(env: &Path) -> PathBuf {
        let exe = if cfg!(windows) { "python.exe" } else { "python" };
        bin_dir(env).join(exe)
    }

    /// Shell command that activates the environment, relative to the project root.
    pub fn activate_command(env_dir: &str) -> String {
        if cfg!(windows) {
            format!("{}\\Scripts\\activate", env_dir)
        } else {
            format!("source {}/bin/activate", env_dir)
        }
    }
}
