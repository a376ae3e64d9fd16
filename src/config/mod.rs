//! Project configuration (`pdeps.toml`).
//!
//! pdeps works without any configuration: partials are read from
//! `layouts/partials` below the current directory. A `pdeps.toml` file adjusts
//! the defaults for a project.
//!
//! # Location
//!
//! 1. `--config <file>` on the command line
//! 2. the `PDEPS_CONFIG` environment variable
//! 3. the first `pdeps.toml` found in the current directory or its parents
//!
//! A file named explicitly (1 or 2) must exist. A searched file is optional.
//!
//! # Format
//!
//! ```toml
//! # Directory holding the partials, relative to this file
//! partials_dir = "themes/site/layouts/partials"
//!
//! # Template file extension
//! extension = "html"
//!
//! # How references select partials: "contains" or "glob"
//! match_mode = "contains"
//!
//! # Files to leave out, relative to partials_dir
//! exclude = ["drafts/**", "**/*.bak.html"]
//!
//! # Concurrent file reads
//! max_parallel = 8
//! ```
//!
//! Every field is optional and unknown fields are rejected.

pub mod parser;

pub use parser::parse_config;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::constants::{CONFIG_FILE_NAME, DEFAULT_EXTENSION, DEFAULT_PARTIALS_DIR, default_max_parallel};
use crate::core::PdepsError;
use crate::discovery::DiscoveryOptions;
use crate::pattern::{KeyMatcher, MatchMode};

/// Contents of a `pdeps.toml` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Partials directory, relative to the config file
    pub partials_dir: PathBuf,
    /// Template file extension
    pub extension: String,
    /// Reference matching strategy
    pub match_mode: MatchMode,
    /// Exclusion globs, relative to the partials directory
    pub exclude: Vec<String>,
    /// Concurrent file reads (defaults to the CPU count)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_parallel: Option<usize>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            partials_dir: PathBuf::from(DEFAULT_PARTIALS_DIR),
            extension: DEFAULT_EXTENSION.to_string(),
            match_mode: MatchMode::default(),
            exclude: Vec::new(),
            max_parallel: None,
        }
    }
}

/// Search `start` and its ancestors for [`CONFIG_FILE_NAME`].
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start.ancestors().map(|dir| dir.join(CONFIG_FILE_NAME)).find(|candidate| candidate.is_file())
}

/// Effective settings after locating and validating the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Config file the settings were read from, if any
    pub config_path: Option<PathBuf>,
    /// Absolute or working-directory-relative partials directory
    pub partials_dir: PathBuf,
    /// Template file extension
    pub extension: String,
    /// Reference matching strategy
    pub match_mode: MatchMode,
    /// Exclusion globs
    pub exclude: Vec<String>,
    /// Concurrent file reads, at least 1
    pub max_parallel: usize,
}

impl Settings {
    /// Load settings for a run started in `cwd`.
    ///
    /// `explicit` is a config path given on the command line or through the
    /// environment; it must exist. Otherwise the nearest `pdeps.toml` is used,
    /// and defaults apply when there is none.
    ///
    /// # Errors
    ///
    /// Returns [`PdepsError::ConfigNotFound`] for a missing explicit file,
    /// [`PdepsError::ConfigParseError`] for a file that does not parse, and
    /// [`PdepsError::InvalidConfig`] for invalid values.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        let config_path = match explicit {
            Some(path) => {
                let path = cwd.join(path);
                if !path.is_file() {
                    return Err(PdepsError::ConfigNotFound {
                        path: path.display().to_string(),
                    }
                    .into());
                }
                Some(path)
            }
            None => find_config(cwd),
        };

        let (config, base) = match &config_path {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                let config: ProjectConfig =
                    parse_config(path).map_err(|e| PdepsError::ConfigParseError {
                        file: path.display().to_string(),
                        reason: e.root_cause().to_string(),
                    })?;
                let base = path.parent().map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);
                (config, base)
            }
            None => {
                debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                (ProjectConfig::default(), cwd.to_path_buf())
            }
        };

        Self::from_config(config, config_path, &base)
    }

    /// Validate a parsed config, resolving `partials_dir` against `base`.
    ///
    /// # Errors
    ///
    /// Returns [`PdepsError::InvalidConfig`] for an empty extension or a
    /// `max_parallel` of zero.
    pub fn from_config(
        config: ProjectConfig,
        config_path: Option<PathBuf>,
        base: &Path,
    ) -> Result<Self> {
        let extension = config.extension.trim_start_matches('.').to_string();
        if extension.is_empty() {
            return Err(PdepsError::InvalidConfig {
                message: "extension must not be empty".to_string(),
            }
            .into());
        }

        let max_parallel = match config.max_parallel {
            Some(0) => {
                return Err(PdepsError::InvalidConfig {
                    message: "max_parallel must be at least 1".to_string(),
                }
                .into());
            }
            Some(n) => n,
            None => default_max_parallel(),
        };

        Ok(Self {
            config_path,
            partials_dir: base.join(&config.partials_dir),
            extension,
            match_mode: config.match_mode,
            exclude: config.exclude,
            max_parallel,
        })
    }

    /// Replace the partials directory (relative paths are taken from `cwd`).
    #[must_use]
    pub fn with_partials_dir(mut self, dir: &Path, cwd: &Path) -> Self {
        self.partials_dir = cwd.join(dir);
        self
    }

    /// The reference matcher for the configured mode.
    #[must_use]
    pub fn matcher(&self) -> Arc<dyn KeyMatcher> {
        self.match_mode.matcher(&self.extension)
    }

    /// Discovery options for these settings.
    #[must_use]
    pub fn discovery_options(&self, show_progress: bool) -> DiscoveryOptions {
        DiscoveryOptions {
            extension: self.extension.clone(),
            exclude: self.exclude.clone(),
            max_parallel: self.max_parallel,
            show_progress,
        }
    }
}
