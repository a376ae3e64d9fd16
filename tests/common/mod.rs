//! Common test utilities for pdeps integration tests

// Not every helper is used by every test file
#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use pdeps_cli::test_utils::PartialTree;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary template project with a `layouts/partials` directory.
pub struct TestProject {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    project_dir: PathBuf,
}

impl TestProject {
    /// Create an empty project directory.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("site");
        fs::create_dir_all(&project_dir)?;

        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    /// Create a project and write `tree` relative to it.
    pub fn with_partials(build: impl FnOnce(PartialTree) -> PartialTree) -> Result<Self> {
        let project = Self::new()?;
        project.write_partials("layouts/partials", build)?;
        Ok(project)
    }

    /// Project root.
    pub fn path(&self) -> &Path {
        &self.project_dir
    }

    /// Write partials below `relative_dir`.
    pub fn write_partials(
        &self,
        relative_dir: &str,
        build: impl FnOnce(PartialTree) -> PartialTree,
    ) -> Result<PathBuf> {
        build(PartialTree::new(self.project_dir.join(relative_dir))).write()
    }

    /// Write `pdeps.toml` at the project root.
    pub fn write_config(&self, content: &str) -> Result<()> {
        fs::write(self.project_dir.join("pdeps.toml"), content)?;
        Ok(())
    }

    /// `pdeps` command running in the project root.
    pub fn pdeps(&self) -> Command {
        let mut cmd = Command::cargo_bin("pdeps").expect("pdeps binary is built");
        cmd.current_dir(&self.project_dir)
            .env("NO_COLOR", "1")
            .env_remove("PDEPS_CONFIG")
            .env_remove("RUST_LOG")
            .arg("--no-progress");
        cmd
    }

    /// Run `pdeps` with `args` and parse stdout as JSON; panics on failure.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.pdeps().args(args).output().expect("pdeps runs");
        assert!(
            output.status.success(),
            "pdeps {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("stdout is JSON")
    }
}

/// A small site used by most tests.
///
/// ```text
/// site/page -> site/header -> site/nav
///           -> cards/list  -> cards/item.html
///           -> site/footer -> site/nav
/// site/nav  -> site/menu   -> site/nav (cycle)
/// ```
pub fn sample_site(tree: PartialTree) -> PartialTree {
    tree.referencing("site/page", &["site/header", "cards/list", "site/footer"])
        .referencing("site/header", &["site/nav"])
        .referencing("site/nav", &["site/menu"])
        .referencing("site/menu", &["site/nav"])
        .partial("cards/list", r#"{{ range . }}{{ partialCached "cards/item.html" . .ID }}{{ end }}"#)
        .partial("cards/item", "<li>{{ .Title }}</li>")
        .referencing("site/footer", &["site/nav"])
}
