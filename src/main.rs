use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sprout::config::{Config, RemotePolicy};
use sprout::environment::VenvProvider;
use sprout::error::{ErrorClass, EXIT_FAILURE};
use sprout::forge::{ForgeWriter, GitHubWriter, NoneWriter, Visibility};
use sprout::git::GitCli;
use sprout::pipeline::{provision, ProvisionOptions, Providers};
use sprout::prompt::{FixedAnswer, Prompter, StdinPrompter};
use sprout::ProvisionError;

/// Environment variable holding the log filter
const LOG_ENV_VAR: &str = "SPROUT_LOG";

#[derive(Parser)]
#[command(
    name = "sprout",
    version = env!("CARGO_PKG_VERSION"),
    about = "Bootstrap a new Python project: venv, boilerplate, git, and an optional GitHub repo",
    long_about = None
)]
struct Cli {
    /// Project name (a new directory with this name is created here)
    name: Option<String>,

    /// Python interpreter used to create the environment
    #[arg(long, value_name = "PATH")]
    python: Option<String>,

    /// Additional packages to install (e.g., --with requests,rich)
    #[arg(long, value_delimiter = ',', value_name = "PACKAGES")]
    with: Vec<String>,

    /// Treat a failed dependency install as fatal and remove the project
    #[arg(long)]
    strict_deps: bool,

    /// Create the GitHub repository without asking
    #[arg(short = 'y', long, conflicts_with = "local")]
    yes: bool,

    /// Local-only mode (skip GitHub integration)
    #[arg(long)]
    local: bool,

    /// Create the GitHub repository as private
    #[arg(long)]
    private: bool,

    /// Verbose diagnostic logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize tracing on stderr; stdout carries the operator-facing output
fn init_tracing(verbose: bool) {
    let default = if verbose { "sprout=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

/// Merge config file values with command-line flags
fn resolve_options(cli: &Cli, mut config: Config) -> ProvisionOptions {
    config.dependencies.extra.extend(cli.with.iter().cloned());
    if cli.strict_deps {
        config.dependencies.strict = true;
    }
    if cli.local {
        config.remote.policy = RemotePolicy::Never;
    } else if cli.yes {
        config.remote.policy = RemotePolicy::Always;
    }
    if cli.private {
        config.remote.visibility = Visibility::Private;
    }
    ProvisionOptions::from_config(&config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(name) = cli.name.as_deref() else {
        eprintln!("Error: missing project name");
        eprintln!();
        eprintln!("Usage: sprout <NAME>");
        eprintln!("Run 'sprout --help' for all options.");
        return ExitCode::from(EXIT_FAILURE as u8);
    };

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return ExitCode::from(EXIT_FAILURE as u8);
        }
    };

    let interpreter = cli
        .python
        .clone()
        .unwrap_or_else(|| config.python.interpreter.clone());
    let options = resolve_options(&cli, config);
    tracing::debug!(?options, "resolved options");

    let venv = VenvProvider::new(interpreter);
    let forge: &dyn ForgeWriter = if cli.local { &NoneWriter } else { &GitHubWriter };
    let always_yes = FixedAnswer(true);
    let prompter: &dyn Prompter = if cli.yes { &always_yes } else { &StdinPrompter };
    let providers = Providers {
        environment: &venv,
        vcs: &GitCli,
        forge,
        prompter,
    };

    match provision(name, &providers, &options) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn report_error(err: &ProvisionError) {
    match err.class() {
        ErrorClass::Usage => {
            eprintln!("Error: {err}");
            eprintln!("Run 'sprout --help' for usage.");
        }
        ErrorClass::Conflict => {
            eprintln!("Error: {err}");
            eprintln!("Choose another name or remove the existing directory.");
        }
        ErrorClass::Fatal if err.rolled_back() => {
            eprintln!("Error: project setup failed; nothing was left behind.");
        }
        ErrorClass::Fatal => {
            eprintln!("Error: {err}");
            if let ProvisionError::RollbackIncomplete { path, .. } = err {
                eprintln!("Remove '{}' by hand before retrying.", path.display());
            }
        }
    }
}
