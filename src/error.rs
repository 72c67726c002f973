//! Fatal errors for the provisioning pipeline.
//!
//! Non-fatal problems (dependency install, commit, remote) never surface here;
//! they are collected as warnings on the run report instead.

use std::path::PathBuf;
use thiserror::Error;

/// Exit status for any fatal abort.
pub const EXIT_FAILURE: i32 = 1;

/// Broad failure class, used for operator-facing hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Missing or invalid input. Nothing was touched.
    Usage,
    /// Target directory already exists. Nothing was touched.
    Conflict,
    /// A provisioning step failed after work began.
    Fatal,
}

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("{0}")]
    Usage(String),

    #[error("Directory '{}' already exists", path.display())]
    Conflict { path: PathBuf },

    #[error("Failed to create project directory '{}': {source}", path.display())]
    RootCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create Python environment at '{}': {source:#}", path.display())]
    Environment {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to install dependencies ({packages}): {source:#}")]
    Dependencies {
        packages: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to write boilerplate files: {source:#}")]
    Boilerplate {
        #[source]
        source: anyhow::Error,
    },

    /// A fatal error whose rollback did not finish; `path` may still exist.
    #[error("{source} (rollback incomplete, '{}' may remain)", path.display())]
    RollbackIncomplete {
        path: PathBuf,
        /// Labels of the compensations that failed
        failed: Vec<String>,
        #[source]
        source: Box<ProvisionError>,
    },
}

impl ProvisionError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ProvisionError::Usage(_) => ErrorClass::Usage,
            ProvisionError::Conflict { .. } => ErrorClass::Conflict,
            ProvisionError::RootCreation { .. }
            | ProvisionError::Environment { .. }
            | ProvisionError::Dependencies { .. }
            | ProvisionError::Boilerplate { .. }
            | ProvisionError::RollbackIncomplete { .. } => ErrorClass::Fatal,
        }
    }

    /// Process exit status for this error. All fatal classes share one code.
    pub fn exit_code(&self) -> i32 {
        EXIT_FAILURE
    }

    /// Whether the Project Root was created and then fully removed for this
    /// error.
    pub fn rolled_back(&self) -> bool {
        matches!(
            self,
            ProvisionError::Environment { .. }
                | ProvisionError::Dependencies { .. }
                | ProvisionError::Boilerplate { .. }
        )
    }
}
