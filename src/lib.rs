pub mod config;
pub mod environment;
pub mod error;
pub mod forge;
pub mod git;
pub mod paths;
pub mod pipeline;
pub mod prompt;
pub mod scaffold;

mod process;

// Re-export commonly used types
pub use config::Config;
pub use error::ProvisionError;
pub use pipeline::{provision, provision_in, ProvisionOptions, ProvisionReport, Providers};
