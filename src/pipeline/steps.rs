//! Step implementations for the provisioning pipeline

use anyhow::Context;
use colored::Colorize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::rollback::CompensationStack;
use super::{
    ProvisionOptions, ProvisionReport, Providers, RemoteOutcome, SkipReason, Step, Warning,
};
use crate::config::RemotePolicy;
use crate::error::ProvisionError;
use crate::forge::{self, NewRepo};
use crate::paths;
use crate::scaffold::Scaffold;

/// Run every step for an already validated `name`.
pub(super) fn run(
    base_dir: &Path,
    name: &str,
    providers: &Providers<'_>,
    options: &ProvisionOptions,
) -> Result<ProvisionReport, ProvisionError> {
    println!("🌱 Creating project: {name}");

    let root = create_root(&base_dir.join(name))?;
    println!("  ✓ Created {}/", name);

    let mut rollback = CompensationStack::new();
    {
        let root = root.clone();
        rollback.push("remove project directory", move || {
            fs::remove_dir_all(&root)
                .with_context(|| format!("Failed to remove {}", root.display()))
        });
    }

    let mut warnings = Vec::new();
    let env_path = match prepare(&root, name, providers, options, &mut warnings) {
        Ok(env_path) => {
            rollback.disarm();
            env_path
        }
        Err(err) => {
            eprintln!("\n❌ {err}");
            tracing::error!("fatal: {err}");
            return Err(abort(rollback, &root, err));
        }
    };

    let committed = commit(&root, providers, options, &mut warnings);
    let remote = publish(&root, name, providers, options, committed, &mut warnings);

    let project_root = root.canonicalize().unwrap_or(root);
    let report = ProvisionReport {
        project_root,
        env_path,
        warnings,
        committed,
        remote,
    };
    print_completion(name, &report, options);
    Ok(report)
}

/// Step 1: create-only, so an existing directory is the only conflict signal.
fn create_root(root: &Path) -> Result<PathBuf, ProvisionError> {
    match fs::create_dir(root) {
        Ok(()) => Ok(root.to_path_buf()),
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            tracing::debug!(path = %root.display(), "target exists");
            Err(ProvisionError::Conflict {
                path: root.to_path_buf(),
            })
        }
        Err(source) => Err(ProvisionError::RootCreation {
            path: root.to_path_buf(),
            source,
        }),
    }
}

/// Steps 2-4. Any error here is fatal and rolls the project back.
fn prepare(
    root: &Path,
    name: &str,
    providers: &Providers<'_>,
    options: &ProvisionOptions,
    warnings: &mut Vec<Warning>,
) -> Result<PathBuf, ProvisionError> {
    let env_path = paths::project::env_dir(root, &options.env_dir);

    println!(
        "🐍 Creating environment ({})...",
        providers.environment.name()
    );
    providers
        .environment
        .create(&env_path)
        .map_err(|source| ProvisionError::Environment {
            path: env_path.clone(),
            source,
        })?;
    println!("  ✓ Created {}/", options.env_dir);

    install_dependencies(&env_path, providers, options, warnings)?;

    let written = Scaffold::new(name)
        .with_env_dir(&options.env_dir)
        .write_all(root)
        .map_err(|source| ProvisionError::Boilerplate { source })?;
    for path in &written {
        if let Some(file) = path.file_name() {
            println!("  ✓ Created {}", file.to_string_lossy());
        }
    }

    Ok(env_path)
}

/// Step 3: warning by default, fatal when strict.
fn install_dependencies(
    env_path: &Path,
    providers: &Providers<'_>,
    options: &ProvisionOptions,
    warnings: &mut Vec<Warning>,
) -> Result<(), ProvisionError> {
    if options.packages.is_empty() {
        return Ok(());
    }
    let packages = options.packages.join(", ");

    println!("📦 Installing {packages}...");
    match providers.environment.install(env_path, &options.packages) {
        Ok(()) => {
            println!("  ✓ Installed dependencies");
            Ok(())
        }
        Err(source) if options.strict_deps => {
            Err(ProvisionError::Dependencies { packages, source })
        }
        Err(err) => {
            println!("⚠️  Dependency install failed: {err:#}");
            println!("   The entry point will not run until you install: {packages}");
            warn(warnings, Step::InstallDependencies, format!("{err:#}"));
            Ok(())
        }
    }
}

/// Step 5. Returns whether the commit landed.
fn commit(
    root: &Path,
    providers: &Providers<'_>,
    options: &ProvisionOptions,
    warnings: &mut Vec<Warning>,
) -> bool {
    println!("📝 Initializing git repository...");

    let result = providers
        .vcs
        .init(root, &options.branch)
        .and_then(|()| providers.vcs.stage_all(root))
        .and_then(|()| providers.vcs.commit(root, &options.commit_message));

    match result {
        Ok(()) => {
            println!("  ✓ Committed: {}", options.commit_message);
            true
        }
        Err(err) => {
            println!("⚠️  Initial commit failed: {err:#}");
            warn(warnings, Step::VersionControl, format!("{err:#}"));
            false
        }
    }
}

/// Step 6. Never fatal.
fn publish(
    root: &Path,
    name: &str,
    providers: &Providers<'_>,
    options: &ProvisionOptions,
    committed: bool,
    warnings: &mut Vec<Warning>,
) -> RemoteOutcome {
    if !committed {
        println!("ℹ️  Skipping remote repository (nothing committed)");
        return RemoteOutcome::Skipped(SkipReason::NotCommitted);
    }
    let forge = providers.forge;
    if options.remote_policy == RemotePolicy::Never || !forge.is_enabled() {
        tracing::debug!(forge = forge.name(), "remote hosting disabled, skipping");
        return RemoteOutcome::Skipped(SkipReason::Disabled);
    }

    if !forge.is_available() {
        println!(
            "ℹ️  {} CLI not found, skipping remote repository",
            forge.name()
        );
        return RemoteOutcome::Skipped(SkipReason::CliMissing);
    }

    let proceed = match options.remote_policy {
        RemotePolicy::Always => true,
        RemotePolicy::Never => false,
        RemotePolicy::Ask => {
            let question = format!(
                "Create a {} {} repository '{}' and push?",
                options.visibility,
                forge.name(),
                name
            );
            providers.prompter.confirm(&question).unwrap_or_else(|err| {
                tracing::warn!("prompt failed, treating as no: {err:#}");
                false
            })
        }
    };
    if !proceed {
        return RemoteOutcome::Declined;
    }

    let repo = NewRepo {
        name: name.to_string(),
        visibility: options.visibility,
        description: forge::description(name, chrono::Local::now().date_naive()),
        branch: options.branch.clone(),
    };

    println!("🚀 Creating {} repository...", forge.name());
    match forge.create_repo(&repo, root) {
        Ok(url) => {
            println!("  ✓ Pushed to {url}");
            RemoteOutcome::Created(url)
        }
        Err(err) => {
            println!("⚠️  Remote repository failed: {err:#}");
            println!("   To finish by hand:");
            let user = forge.current_user().ok();
            for line in forge::manual_instructions(root, name, user.as_deref(), &options.branch) {
                println!("     {line}");
            }
            let message = format!("{err:#}");
            warn(warnings, Step::RemoteHosting, message.clone());
            RemoteOutcome::Failed(message)
        }
    }
}

/// Step 7.
fn print_completion(name: &str, report: &ProvisionReport, options: &ProvisionOptions) {
    let headline = format!("✨ Project '{name}' is ready!");
    if report.has_warnings() {
        println!("\n{}", headline.yellow().bold());
        println!("   Completed with {} warning(s):", report.warnings.len());
        for warning in &report.warnings {
            println!("   - {}: {}", warning.step, warning.message);
        }
    } else {
        println!("\n{}", headline.green().bold());
    }

    println!("\n📁 {}", report.project_root.display());
    println!("\n{}", "Next steps:".bold());
    println!("   cd {}", report.project_root.display());
    println!("   {}", paths::env::activate_command(&options.env_dir));
    println!("   python {}", paths::project::ENTRY_POINT);
}

/// Unwind `rollback` after `err`. Wraps `err` when any compensation failed.
fn abort(rollback: CompensationStack, root: &Path, err: ProvisionError) -> ProvisionError {
    eprintln!("🧹 Rolling back: removing {}", root.display());
    let failed: Vec<String> = rollback
        .unwind()
        .into_iter()
        .map(|(label, cause)| {
            eprintln!("⚠️  Rollback step '{label}' failed: {cause:#}");
            label
        })
        .collect();

    if failed.is_empty() {
        return err;
    }
    ProvisionError::RollbackIncomplete {
        path: root.to_path_buf(),
        failed,
        source: Box::new(err),
    }
}

fn warn(warnings: &mut Vec<Warning>, step: Step, message: String) {
    tracing::warn!("{step} failed: {message}");
    warnings.push(Warning { step, message });
}
