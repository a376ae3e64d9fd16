//! Test utilities for pdeps
//!
//! Helpers shared by unit tests and the integration suite: one-time logging
//! setup and a small builder that lays out partial files on disk.
//!
//! # Example
//!
//! ```rust,no_run
//! use pdeps_cli::test_utils::PartialTree;
//! use std::path::Path;
//!
//! # fn example(root: &Path) -> anyhow::Result<()> {
//! let dir = PartialTree::new(root.join("layouts/partials"))
//!     .partial("site/page", r#"{{ partial "site/header" . }}"#)
//!     .partial("site/header", "<header></header>")
//!     .write()?;
//! assert!(dir.join("site/page.html").exists());
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::constants::DEFAULT_EXTENSION;
use crate::core::PartialSource;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, tests run without logging.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// Builder for a directory of partial templates.
///
/// Keys are `type/entry`; each becomes `<root>/<type>/<entry>.<extension>`.
#[derive(Debug, Clone)]
pub struct PartialTree {
    root: PathBuf,
    extension: String,
    files: Vec<(String, String)>,
}

impl PartialTree {
    /// Start an empty tree rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            files: Vec::new(),
        }
    }

    /// Use a different template extension.
    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Add a partial with the given content.
    #[must_use]
    pub fn partial(mut self, key: &str, content: impl Into<String>) -> Self {
        self.files.push((key.to_string(), content.into()));
        self
    }

    /// Add a partial whose content references each of `refs`.
    #[must_use]
    pub fn referencing(self, key: &str, refs: &[&str]) -> Self {
        let content: String =
            refs.iter().map(|r| format!("{{{{ partial \"{r}\" . }}}}\n")).collect();
        self.partial(key, content)
    }

    /// The sources this tree describes, in insertion order, without touching
    /// the filesystem.
    ///
    /// # Panics
    ///
    /// Panics if a key has no `/`.
    pub fn sources(&self) -> Vec<PartialSource> {
        self.files
            .iter()
            .map(|(key, content)| {
                let (partial_type, entry) =
                    key.split_once('/').unwrap_or_else(|| panic!("invalid partial key: {key}"));
                PartialSource::new(partial_type, entry, content.clone())
            })
            .collect()
    }

    /// Write every partial to disk and return the root directory.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or file cannot be created.
    pub fn write(&self) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create {}", self.root.display()))?;
        for (key, content) in &self.files {
            let path = self.path_of(key);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        Ok(self.root.clone())
    }

    /// On-disk location of `key`.
    pub fn path_of(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.{}", self.extension))
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
