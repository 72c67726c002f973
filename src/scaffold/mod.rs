//! Boilerplate files for a new project.
//!
//! Three files, each written exactly once from an embedded template:
//! the entry point, the secrets template, and the ignore rules. Templates may
//! reference `{{.name}}` (the project name) and `{{.env_dir}}` (the
//! environment directory, always ignored).

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::paths::project;

/// Import and setup lines at the top of the entry point, in order.
pub const ENTRY_POINT_IMPORTS: &[&str] = &[
    "import os",
    "",
    "from dotenv import load_dotenv",
    "",
    "load_dotenv()",
];

const ENTRY_POINT_BODY: &str = include_str!("../../resources/templates/python/main.py.tmpl");
const ENV_TEMPLATE: &str = include_str!("../../resources/templates/python/env.example.tmpl");
const GITIGNORE: &str = include_str!("../../resources/templates/python/gitignore.tmpl");

/// Writes the boilerplate for one project.
pub struct Scaffold {
    project_name: String,
    env_dir: String,
}

impl Scaffold {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            env_dir: project::DEFAULT_ENV_DIR.to_string(),
        }
    }

    /// Environment directory the ignore rules must cover.
    pub fn with_env_dir(mut self, env_dir: impl Into<String>) -> Self {
        self.env_dir = env_dir.into();
        self
    }

    /// Entry point source: import block, blank line, body.
    pub fn entry_point(&self) -> String {
        let mut source = ENTRY_POINT_IMPORTS.join("\n");
        source.push_str("\n\n\n");
        source.push_str(&self.render(ENTRY_POINT_BODY));
        source
    }

    pub fn env_template(&self) -> String {
        self.render(ENV_TEMPLATE)
    }

    pub fn gitignore(&self) -> String {
        self.render(GITIGNORE)
    }

    /// Write every file under `root`. Fails rather than overwrite.
    ///
    /// Returns the written paths in order.
    pub fn write_all(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let files = [
            (project::entry_point(root), self.entry_point()),
            (project::env_template(root), self.env_template()),
            (project::gitignore(root), self.gitignore()),
        ];

        let mut written = Vec::with_capacity(files.len());
        for (path, content) in files {
            write_new(&path, &content)?;
            tracing::debug!(path = %path.display(), bytes = content.len(), "wrote boilerplate");
            written.push(path);
        }
        Ok(written)
    }

    fn render(&self, template: &str) -> String {
        template
            .replace("{{.name}}", &self.project_name)
            .replace("{{.env_dir}}", &self.env_dir)
    }
}

fn write_new(path: &Path, content: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
