//! Pipeline behavior against fake providers
//!
//! Run with: cargo test --test provision

use anyhow::{bail, Result};
use std::cell::{Cell, RefCell};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use sprout::config::RemotePolicy;
use sprout::environment::EnvironmentProvider;
use sprout::forge::{ForgeWriter, NewRepo, NoneWriter, Visibility};
use sprout::git::VersionControl;
use sprout::pipeline::{
    provision_in, ProvisionOptions, Providers, RemoteOutcome, SkipReason, Step,
};
use sprout::prompt::Prompter;
use sprout::ProvisionError;

// ============================================================================
// Fakes
// ============================================================================

#[derive(Default)]
struct FakeEnv {
    fail_create: bool,
    fail_install: bool,
    /// Leave a directory where the entry point goes, so boilerplate fails
    block_entry_point: bool,
    installed: RefCell<Vec<String>>,
}

impl EnvironmentProvider for FakeEnv {
    fn name(&self) -> &str {
        "fake"
    }

    fn create(&self, env_path: &Path) -> Result<()> {
        fs::create_dir_all(env_path.join("bin"))?;
        if self.fail_create {
            bail!("interpreter crashed");
        }
        if self.block_entry_point {
            if let Some(root) = env_path.parent() {
                fs::create_dir(root.join("main.py"))?;
            }
        }
        Ok(())
    }

    fn install(&self, _env_path: &Path, packages: &[String]) -> Result<()> {
        if self.fail_install {
            bail!("no network");
        }
        self.installed.borrow_mut().extend(packages.iter().cloned());
        Ok(())
    }
}

#[derive(Default)]
struct FakeVcs {
    fail_commit: bool,
    calls: RefCell<Vec<String>>,
}

impl VersionControl for FakeVcs {
    fn init(&self, repo: &Path, branch: &str) -> Result<()> {
        fs::create_dir(repo.join(".git"))?;
        self.calls.borrow_mut().push(format!("init {branch}"));
        Ok(())
    }

    fn stage_all(&self, _repo: &Path) -> Result<()> {
        self.calls.borrow_mut().push("stage".to_string());
        Ok(())
    }

    fn commit(&self, _repo: &Path, message: &str) -> Result<()> {
        if self.fail_commit {
            bail!("Author identity unknown");
        }
        self.calls.borrow_mut().push(format!("commit {message}"));
        Ok(())
    }
}

#[derive(Default)]
struct FakeForge {
    available: bool,
    fail: bool,
    created: RefCell<Vec<NewRepo>>,
}

impl ForgeWriter for FakeForge {
    fn name(&self) -> &str {
        "FakeHub"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn current_user(&self) -> Result<String> {
        Ok("octocat".to_string())
    }

    fn create_repo(&self, repo: &NewRepo, _repo_path: &Path) -> Result<String> {
        if self.fail {
            bail!("HTTP 422: name already exists on this account");
        }
        self.created.borrow_mut().push(repo.clone());
        Ok(format!("https://fakehub.test/octocat/{}", repo.name))
    }
}

/// Answers with a fixed value and counts how often it was asked.
struct CountingPrompter {
    answer: bool,
    asked: Cell<u32>,
}

impl CountingPrompter {
    fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: Cell::new(0),
        }
    }
}

impl Prompter for CountingPrompter {
    fn confirm(&self, _question: &str) -> Result<bool> {
        self.asked.set(self.asked.get() + 1);
        Ok(self.answer)
    }
}

fn providers<'a>(
    env: &'a FakeEnv,
    vcs: &'a FakeVcs,
    forge: &'a FakeForge,
    prompter: &'a CountingPrompter,
) -> Providers<'a> {
    Providers {
        environment: env,
        vcs,
        forge,
        prompter,
    }
}

// ============================================================================
// Happy path
// ============================================================================

#[test]
fn test_success_creates_full_project() -> Result<()> {
    let temp = TempDir::new()?;
    let (env, vcs, forge) = (FakeEnv::default(), FakeVcs::default(), FakeForge::default());
    let prompter = CountingPrompter::new(false);

    let report = provision_in(
        temp.path(),
        "demo",
        &providers(&env, &vcs, &forge, &prompter),
        &ProvisionOptions::default(),
    )?;

    let root = temp.path().join("demo");
    assert!(root.join("venv").is_dir());
    assert!(root.join("main.py").is_file());
    assert!(root.join(".env.example").is_file());
    assert!(root.join(".gitignore").is_file());
    assert!(root.join(".git").is_dir());

    assert!(report.project_root.is_absolute());
    assert_eq!(report.project_root, root.canonicalize()?);
    assert!(report.committed);
    assert!(report.warnings.is_empty());
    assert_eq!(*env.installed.borrow(), vec!["python-dotenv".to_string()]);
    assert_eq!(
        *vcs.calls.borrow(),
        vec!["init main", "stage", "commit Initial commit"]
    );
    Ok(())
}

#[test]
fn test_extra_packages_installed_after_required() -> Result<()> {
    let temp = TempDir::new()?;
    let (env, vcs, forge) = (FakeEnv::default(), FakeVcs::default(), FakeForge::default());
    let prompter = CountingPrompter::new(false);
    let options = ProvisionOptions {
        packages: vec!["python-dotenv".into(), "requests".into()],
        ..ProvisionOptions::default()
    };

    provision_in(
        temp.path(),
        "demo",
        &providers(&env, &vcs, &forge, &prompter),
        &options,
    )?;

    assert_eq!(*env.installed.borrow(), vec!["python-dotenv", "requests"]);
    Ok(())
}

// ============================================================================
// Usage and conflict errors
// ============================================================================

#[test]
fn test_empty_name_touches_nothing() -> Result<()> {
    let temp = TempDir::new()?;
    let (env, vcs, forge) = (FakeEnv::default(), FakeVcs::default(), FakeForge::default());
    let prompter = CountingPrompter::new(false);

    let err = provision_in(
        temp.path(),
        "",
        &providers(&env, &vcs, &forge, &prompter),
        &ProvisionOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, ProvisionError::Usage(_)));
    assert_ne!(err.exit_code(), 0);
    assert_eq!(fs::read_dir(temp.path())?.count(), 0);
    Ok(())
}

#[test]
fn test_existing_directory_is_conflict_and_untouched() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path().join("demo");
    fs::create_dir(&root)?;
    fs::write(root.join("notes.txt"), "mine")?;

    let (env, vcs, forge) = (FakeEnv::default(), FakeVcs::default(), FakeForge::default());
    let prompter = CountingPrompter::new(false);

    let err = provision_in(
        temp.path(),
        "demo",
        &providers(&env, &vcs, &forge, &prompter),
        &ProvisionOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, ProvisionError::Conflict { .. }));
    assert_ne!(err.exit_code(), 0);
    assert_eq!(fs::read_to_string(root.join("notes.txt"))?, "mine");
    assert_eq!(fs::read_dir(&root)?.count(), 1);
    assert!(env.installed.borrow().is_empty());
    Ok(())
}

#[test]
fn test_rerun_with_same_name_conflicts() -> Result<()> {
    let temp = TempDir::new()?;
    let (env, vcs, forge) = (FakeEnv::default(), FakeVcs::default(), FakeForge::default());
    let prompter = CountingPrompter::new(false);
    let providers = providers(&env, &vcs, &forge, &prompter);

    provision_in(temp.path(), "demo", &providers, &ProvisionOptions::default())?;
    let err = provision_in(temp.path(), "demo", &providers, &ProvisionOptions::default())
        .unwrap_err();

    assert!(matches!(err, ProvisionError::Conflict { .. }));
    assert!(temp.path().join("demo/main.py").is_file());
    Ok(())
}

// ============================================================================
// Fatal failures roll back
// ============================================================================

#[test]
fn test_environment_failure_removes_project() -> Result<()> {
    let temp = TempDir::new()?;
    let env = FakeEnv {
        fail_create: true,
        ..FakeEnv::default()
    };
    let (vcs, forge) = (FakeVcs::default(), FakeForge::default());
    let prompter = CountingPrompter::new(false);

    let err = provision_in(
        temp.path(),
        "demo",
        &providers(&env, &vcs, &forge, &prompter),
        &ProvisionOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, ProvisionError::Environment { .. }));
    assert!(err.rolled_back());
    assert_ne!(err.exit_code(), 0);
    assert!(!temp.path().join("demo").exists());
    assert!(vcs.calls.borrow().is_empty());
    Ok(())
}

#[test]
fn test_boilerplate_failure_removes_project() -> Result<()> {
    let temp = TempDir::new()?;
    let env = FakeEnv {
        block_entry_point: true,
        ..FakeEnv::default()
    };
    let (vcs, forge) = (FakeVcs::default(), FakeForge::default());
    let prompter = CountingPrompter::new(false);

    let err = provision_in(
        temp.path(),
        "demo",
        &providers(&env, &vcs, &forge, &prompter),
        &ProvisionOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, ProvisionError::Boilerplate { .. }));
    assert!(!temp.path().join("demo").exists());
    Ok(())
}

#[test]
fn test_strict_dependency_failure_removes_project() -> Result<()> {
    let temp = TempDir::new()?;
    let env = FakeEnv {
        fail_install: true,
        ..FakeEnv::default()
    };
    let (vcs, forge) = (FakeVcs::default(), FakeForge::default());
    let prompter = CountingPrompter::new(false);
    let options = ProvisionOptions {
        strict_deps: true,
        ..ProvisionOptions::default()
    };

    let err = provision_in(
        temp.path(),
        "demo",
        &providers(&env, &vcs, &forge, &prompter),
        &options,
    )
    .unwrap_err();

    assert!(matches!(err, ProvisionError::Dependencies { .. }));
    assert!(!temp.path().join("demo").exists());
    Ok(())
}

// ============================================================================
// Non-fatal warnings
// ============================================================================

#[test]
fn test_dependency_failure_is_warning() -> Result<()> {
    let temp = TempDir::new()?;
    let env = FakeEnv {
        fail_install: true,
        ..FakeEnv::default()
    };
    let (vcs, forge) = (FakeVcs::default(), FakeForge::default());
    let prompter = CountingPrompter::new(false);

    let report = provision_in(
        temp.path(),
        "demo",
        &providers(&env, &vcs, &forge, &prompter),
        &ProvisionOptions::default(),
    )?;

    assert!(temp.path().join("demo/main.py").is_file());
    assert!(report.committed);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].step, Step::InstallDependencies);
    assert!(report.warnings[0].message.contains("no network"));
    Ok(())
}

#[test]
fn test_commit_failure_skips_remote() -> Result<()> {
    let temp = TempDir::new()?;
    let env = FakeEnv::default();
    let vcs = FakeVcs {
        fail_commit: true,
        ..FakeVcs::default()
    };
    let forge = FakeForge {
        available: true,
        ..FakeForge::default()
    };
    let prompter = CountingPrompter::new(true);

    let report = provision_in(
        temp.path(),
        "demo",
        &providers(&env, &vcs, &forge, &prompter),
        &ProvisionOptions::default(),
    )?;

    assert!(!report.committed);
    assert_eq!(report.remote, RemoteOutcome::Skipped(SkipReason::NotCommitted));
    assert_eq!(report.warnings[0].step, Step::VersionControl);
    assert_eq!(prompter.asked.get(), 0);
    assert!(forge.created.borrow().is_empty());
    Ok(())
}

// ============================================================================
// Environment directory
// ============================================================================

#[test]
fn test_env_dir_outside_project_is_rejected() -> Result<()> {
    let temp = TempDir::new()?;
    let env = FakeEnv {
        fail_create: true,
        ..FakeEnv::default()
    };
    let (vcs, forge) = (FakeVcs::default(), FakeForge::default());
    let prompter = CountingPrompter::new(false);
    let options = ProvisionOptions {
        env_dir: "../outside".to_string(),
        ..ProvisionOptions::default()
    };

    let err = provision_in(
        temp.path(),
        "demo",
        &providers(&env, &vcs, &forge, &prompter),
        &options,
    )
    .unwrap_err();

    assert!(matches!(err, ProvisionError::Usage(_)));
    assert!(!temp.path().join("demo").exists());
    assert!(!temp.path().join("outside").exists());
    Ok(())
}

#[test]
fn test_custom_env_dir_is_ignored() -> Result<()> {
    let temp = TempDir::new()?;
    let (env, vcs, forge) = (FakeEnv::default(), FakeVcs::default(), FakeForge::default());
    let prompter = CountingPrompter::new(false);
    let options = ProvisionOptions {
        env_dir: "pyenv".to_string(),
        ..ProvisionOptions::default()
    };

    let report = provision_in(
        temp.path(),
        "demo",
        &providers(&env, &vcs, &forge, &prompter),
        &options,
    )?;

    assert!(report.env_path.ends_with("pyenv"));
    assert!(report.env_path.is_dir());
    let ignore = fs::read_to_string(temp.path().join("demo/.gitignore"))?;
    assert!(ignore.lines().any(|l| l == "pyenv/"));
    Ok(())
}

// ============================================================================
// Remote hosting gate
// ============================================================================

#[test]
fn test_missing_cli_skips_without_prompt() -> Result<()> {
    let temp = TempDir::new()?;
    let (env, vcs) = (FakeEnv::default(), FakeVcs::default());
    let forge = FakeForge::default();
    let prompter = CountingPrompter::new(true);

    let report = provision_in(
        temp.path(),
        "demo",
        &providers(&env, &vcs, &forge, &prompter),
        &ProvisionOptions::default(),
    )?;

    assert_eq!(report.remote, RemoteOutcome::Skipped(SkipReason::CliMissing));
    assert_eq!(prompter.asked.get(), 0);
    assert!(report.warnings.is_empty());
    Ok(())
}

#[test]
fn test_declined_prompt_creates_nothing() -> Result<()> {
    let temp = TempDir::new()?;
    let (env, vcs) = (FakeEnv::default(), FakeVcs::default());
    let forge = FakeForge {
        available: true,
        ..FakeForge::default()
    };
    let prompter = CountingPrompter::new(false);

    let report = provision_in(
        temp.path(),
        "demo",
        &providers(&env, &vcs, &forge, &prompter),
        &ProvisionOptions::default(),
    )?;

    assert_eq!(report.remote, RemoteOutcome::Declined);
    assert_eq!(prompter.asked.get(), 1);
    assert!(forge.created.borrow().is_empty());
    assert!(report.warnings.is_empty());
    Ok(())
}

#[test]
fn test_accepted_prompt_creates_public_repo() -> Result<()> {
    let temp = TempDir::new()?;
    let (env, vcs) = (FakeEnv::default(), FakeVcs::default());
    let forge = FakeForge {
        available: true,
        ..FakeForge::default()
    };
    let prompter = CountingPrompter::new(true);

    let report = provision_in(
        temp.path(),
        "demo",
        &providers(&env, &vcs, &forge, &prompter),
        &ProvisionOptions::default(),
    )?;

    assert_eq!(
        report.remote,
        RemoteOutcome::Created("https://fakehub.test/octocat/demo".to_string())
    );
    let created = forge.created.borrow();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].name, "demo");
    assert_eq!(created[0].visibility, Visibility::Public);
    assert_eq!(created[0].branch, "main");
    assert!(created[0].description.starts_with("demo"));
    assert!(!created[0].description.contains('\n'));
    Ok(())
}

#[test]
fn test_never_policy_skips_even_with_cli() -> Result<()> {
    let temp = TempDir::new()?;
    let (env, vcs) = (FakeEnv::default(), FakeVcs::default());
    let forge = FakeForge {
        available: true,
        ..FakeForge::default()
    };
    let prompter = CountingPrompter::new(true);
    let options = ProvisionOptions {
        remote_policy: RemotePolicy::Never,
        ..ProvisionOptions::default()
    };

    let report = provision_in(
        temp.path(),
        "demo",
        &providers(&env, &vcs, &forge, &prompter),
        &options,
    )?;

    assert_eq!(report.remote, RemoteOutcome::Skipped(SkipReason::Disabled));
    assert_eq!(prompter.asked.get(), 0);
    Ok(())
}

#[test]
fn test_always_policy_does_not_prompt() -> Result<()> {
    let temp = TempDir::new()?;
    let (env, vcs) = (FakeEnv::default(), FakeVcs::default());
    let forge = FakeForge {
        available: true,
        ..FakeForge::default()
    };
    let prompter = CountingPrompter::new(false);
    let options = ProvisionOptions {
        remote_policy: RemotePolicy::Always,
        visibility: Visibility::Private,
        ..ProvisionOptions::default()
    };

    let report = provision_in(
        temp.path(),
        "demo",
        &providers(&env, &vcs, &forge, &prompter),
        &options,
    )?;

    assert!(matches!(report.remote, RemoteOutcome::Created(_)));
    assert_eq!(prompter.asked.get(), 0);
    assert_eq!(forge.created.borrow()[0].visibility, Visibility::Private);
    Ok(())
}

#[test]
fn test_remote_failure_is_warning() -> Result<()> {
    let temp = TempDir::new()?;
    let (env, vcs) = (FakeEnv::default(), FakeVcs::default());
    let forge = FakeForge {
        available: true,
        fail: true,
        ..FakeForge::default()
    };
    let prompter = CountingPrompter::new(true);

    let report = provision_in(
        temp.path(),
        "demo",
        &providers(&env, &vcs, &forge, &prompter),
        &ProvisionOptions::default(),
    )?;

    assert!(matches!(report.remote, RemoteOutcome::Failed(ref msg) if msg.contains("422")));
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].step, Step::RemoteHosting);
    assert!(temp.path().join("demo/main.py").is_file());
    Ok(())
}

#[test]
fn test_no_forge_skips_as_disabled() -> Result<()> {
    let temp = TempDir::new()?;
    let (env, vcs) = (FakeEnv::default(), FakeVcs::default());
    let prompter = CountingPrompter::new(true);
    let providers = Providers {
        environment: &env,
        vcs: &vcs,
        forge: &NoneWriter,
        prompter: &prompter,
    };

    let report = provision_in(temp.path(), "demo", &providers, &ProvisionOptions::default())?;

    assert_eq!(report.remote, RemoteOutcome::Skipped(SkipReason::Disabled));
    assert_eq!(prompter.asked.get(), 0);
    assert!(report.warnings.is_empty());
    Ok(())
}
