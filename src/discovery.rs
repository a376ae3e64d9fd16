//! Partial discovery: finding and reading template partials on disk.
//!
//! Discovery turns a partials directory into the ordered [`PartialSource`]
//! sequence the resolver consumes. The order of that sequence is the
//! *discovery order* that breaks ties between ambiguous references, so it is
//! made deterministic: files are listed in sorted path order and reads, though
//! concurrent, are collected in that same order.
//!
//! # Layout
//!
//! ```text
//! layouts/partials/
//! ├── cards/
//! │   ├── item.html      -> cards/item
//! │   └── list.html      -> cards/list
//! ├── site/
//! │   └── nav/
//! │       └── menu.html  -> nav/menu
//! └── footer.html        -> partials/footer
//! ```
//!
//! The type of a partial is the name of the directory that directly contains
//! the file and the entry is the file stem. Nested directories therefore do
//! not add segments to the key, and two files with the same parent name and
//! stem collide; the resolver keeps the first.
//!
//! # Failure Handling
//!
//! A missing partials directory is an error. A file that cannot be read or is
//! not valid UTF-8 is logged and left out; references to it then resolve to
//! nothing, exactly as if it did not exist.

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::{DEFAULT_EXTENSION, default_max_parallel};
use crate::core::{PartialSource, PdepsError};
use crate::pattern::PatternResolver;
use crate::utils::progress::ProgressBar;

/// Settings controlling which files are read and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Template file extension, without the dot
    pub extension: String,
    /// Globs (relative to the partials directory) of files to skip
    pub exclude: Vec<String>,
    /// Maximum number of concurrent file reads
    pub max_parallel: usize,
    /// Whether to draw a progress bar while reading
    pub show_progress: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            exclude: Vec::new(),
            max_parallel: default_max_parallel(),
            show_progress: false,
        }
    }
}

/// List partial files below `dir`, relative to it, in sorted order.
///
/// # Errors
///
/// Returns [`PdepsError::PartialsDirNotFound`] if `dir` is not a directory and
/// [`PdepsError::InvalidPattern`] for an exclusion glob that does not compile.
pub fn partial_files(dir: &Path, options: &DiscoveryOptions) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PdepsError::PartialsDirNotFound {
            path: dir.display().to_string(),
        }
        .into());
    }

    let mut resolver = PatternResolver::new();
    for exclude in &options.exclude {
        resolver.exclude(exclude).map_err(|e| PdepsError::InvalidPattern {
            pattern: exclude.clone(),
            reason: e.root_cause().to_string(),
        })?;
    }

    let extension = options.extension.trim_start_matches('.');
    let pattern = format!("**/*.{}", Pattern::escape(extension));
    let files = resolver
        .resolve(&pattern, dir)
        .with_context(|| format!("Failed to list partials in {}", dir.display()))?;

    debug!("Found {} partial file(s) in {}", files.len(), dir.display());
    Ok(files)
}

/// Build a source for the file at `path` (absolute or relative to the current
/// directory). Returns `None` when the path has no parent name or stem.
pub fn source_for(path: &Path, content: String) -> Option<PartialSource> {
    let absolute = std::path::absolute(path).ok()?;
    let partial_type = absolute.parent()?.file_name()?.to_str()?.to_string();
    let entry = absolute.file_stem()?.to_str()?.to_string();
    Some(PartialSource::new(partial_type, entry, content).with_path(path))
}

/// Discover and read every partial below `dir`.
///
/// Reads run concurrently, at most `options.max_parallel` at a time, and the
/// result keeps the sorted file order.
///
/// # Errors
///
/// See [`partial_files`]. Individual read failures are not errors.
pub async fn discover_partials(dir: &Path, options: &DiscoveryOptions) -> Result<Vec<PartialSource>> {
    let files = partial_files(dir, options)?;

    let progress = ProgressBar::new(files.len() as u64, options.show_progress);
    progress.set_message("Reading partials");

    let progress_ref = &progress;
    let sources: Vec<Option<PartialSource>> = stream::iter(files.into_iter().map(|relative| {
        let path = dir.join(relative);
        async move {
            let result = tokio::fs::read_to_string(&path).await;
            progress_ref.inc(1);
            match result {
                Ok(content) => {
                    let source = source_for(&path, content);
                    if source.is_none() {
                        warn!("Skipping {}: cannot derive a partial key", path.display());
                    }
                    source
                }
                Err(e) => {
                    warn!("Skipping unreadable partial {}: {}", path.display(), e);
                    None
                }
            }
        }
    }))
    .buffered(options.max_parallel.max(1))
    .collect()
    .await;

    progress.finish_and_clear();

    let sources: Vec<PartialSource> = sources.into_iter().flatten().collect();
    debug!("Read {} partial(s) from {}", sources.len(), dir.display());
    Ok(sources)
}
