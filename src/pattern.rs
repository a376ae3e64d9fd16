//! Glob pattern matching for partial discovery and reference resolution.
//!
//! Two concerns live here:
//!
//! - **File discovery**: [`PatternMatcher`] and [`PatternResolver`] find the
//!   partial files below a directory, with exclusion globs and deterministic
//!   ordering.
//! - **Reference matching**: the [`KeyMatcher`] trait decides whether a
//!   wildcard-wrapped reference denotes a partial key. The key index only
//!   depends on this trait, so the matching engine can be swapped.
//!
//! # Pattern Syntax
//!
//! Standard glob syntax as implemented by the `glob` crate:
//!
//! - `*` matches any sequence of characters, including `/`
//! - `**` matches any sequence of path components
//! - `?` matches any single character
//! - `[abc]`, `[a-z]` match a character class
//!
//! # Match Modes
//!
//! | Mode       | Matcher             | A reference matches a key when...              |
//! |------------|---------------------|------------------------------------------------|
//! | `contains` | [`ContainsMatcher`] | the key (as a glob) matches part of the reference |
//! | `glob`     | [`GlobMatcher`]     | the reference (as a glob) matches the whole key  |
//!
//! `contains` accepts references written with a file extension, so
//! `partial "cards/item.html"` resolves to the key `cards/item`.

use anyhow::{Context, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Decides whether an identifier pattern denotes a candidate partial key.
///
/// Implementations must be pure: the same inputs always give the same answer.
pub trait KeyMatcher: Send + Sync {
    /// Returns `true` if `pattern` denotes `candidate_key`.
    fn matches(&self, pattern: &str, candidate_key: &str) -> bool;
}

impl<F> KeyMatcher for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn matches(&self, pattern: &str, candidate_key: &str) -> bool {
        self(pattern, candidate_key)
    }
}

/// Glob containment: the candidate key, read as a glob, matches some part of
/// the identifier.
///
/// With `*cards/item.html*` as identifier, the keys `cards/item` and `cards/it`
/// both match; the key index breaks such ties by discovery order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainsMatcher;

impl KeyMatcher for ContainsMatcher {
    fn matches(&self, pattern: &str, candidate_key: &str) -> bool {
        if !has_glob_meta(candidate_key) {
            return pattern.contains(candidate_key);
        }

        let key_pattern = Pattern::new(&format!("*{candidate_key}*"))
            .or_else(|_| Pattern::new(&format!("*{}*", Pattern::escape(candidate_key))));

        match key_pattern {
            Ok(p) => p.matches(pattern),
            Err(e) => {
                trace!("Key '{}' is not a usable glob: {}", candidate_key, e);
                false
            }
        }
    }
}

/// Glob match: the identifier is a glob that must match the whole key, or the
/// key with the template extension appended.
#[derive(Debug, Clone, Default)]
pub struct GlobMatcher {
    extension: Option<String>,
}

impl GlobMatcher {
    /// Matcher that also tries `<key>.<extension>`.
    #[must_use]
    pub fn with_extension(extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            extension: (!extension.is_empty()).then_some(extension),
        }
    }
}

impl KeyMatcher for GlobMatcher {
    fn matches(&self, pattern: &str, candidate_key: &str) -> bool {
        let compiled = match Pattern::new(pattern) {
            Ok(p) => p,
            Err(e) => {
                trace!("Reference '{}' is not a valid glob: {}", pattern, e);
                return false;
            }
        };

        if compiled.matches(candidate_key) {
            return true;
        }

        self.extension
            .as_deref()
            .is_some_and(|ext| compiled.matches(&format!("{candidate_key}.{ext}")))
    }
}

/// Selects the [`KeyMatcher`] used for reference resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// [`ContainsMatcher`]
    #[default]
    Contains,
    /// [`GlobMatcher`]
    Glob,
}

impl MatchMode {
    /// Build the matcher for this mode.
    #[must_use]
    pub fn matcher(self, extension: &str) -> Arc<dyn KeyMatcher> {
        match self {
            Self::Contains => Arc::new(ContainsMatcher),
            Self::Glob => Arc::new(GlobMatcher::with_extension(extension)),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains => f.write_str("contains"),
            Self::Glob => f.write_str("glob"),
        }
    }
}

fn has_glob_meta(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

/// Pattern matcher for file discovery.
///
/// # Examples
///
/// ```rust,no_run
/// use pdeps_cli::pattern::PatternMatcher;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let matcher = PatternMatcher::new("**/*.html")?;
///
/// assert!(matcher.matches(Path::new("cards/item.html")));
/// assert!(!matcher.matches(Path::new("cards/item.json")));
///
/// let matches = matcher.find_matches(Path::new("layouts/partials"))?;
/// println!("Found {} partial files", matches.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    pattern: Pattern,
    original_pattern: String,
}

impl PatternMatcher {
    /// Compile a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern contains invalid glob syntax.
    pub fn new(pattern_str: &str) -> Result<Self> {
        let pattern = Pattern::new(pattern_str)
            .with_context(|| format!("Invalid glob pattern: {pattern_str}"))?;

        Ok(Self {
            pattern,
            original_pattern: pattern_str.to_string(),
        })
    }

    /// Finds all files matching the pattern below `base_path`.
    ///
    /// Symlinks are not followed. Returned paths are relative to `base_path`,
    /// in walk order (see [`PatternResolver::resolve`] for sorted results).
    ///
    /// # Errors
    ///
    /// Returns an error if `base_path` cannot be canonicalized.
    pub fn find_matches(&self, base_path: &Path) -> Result<Vec<PathBuf>> {
        debug!("Searching for pattern '{}' in {:?}", self.original_pattern, base_path);

        let mut matches = Vec::new();
        let base_path = base_path
            .canonicalize()
            .with_context(|| format!("Failed to canonicalize path: {base_path:?}"))?;

        for entry in WalkDir::new(&base_path)
            .follow_links(false)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();

            if let Ok(relative_path) = path.strip_prefix(&base_path) {
                let relative_str = relative_path.to_string_lossy();

                trace!("Checking path: {}", relative_str);

                if self.pattern.matches(&relative_str) {
                    matches.push(relative_path.to_path_buf());
                }
            }
        }

        debug!("Found {} matches for pattern '{}'", matches.len(), self.original_pattern);
        Ok(matches)
    }

    /// Checks a single path against the pattern without touching the filesystem.
    pub fn matches(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.pattern.matches(&path_str)
    }

    /// The pattern text this matcher was built from.
    pub fn pattern(&self) -> &str {
        &self.original_pattern
    }
}

/// Resolves a discovery pattern to a sorted, exclusion-filtered file list.
///
/// # Examples
///
/// ```rust,no_run
/// use pdeps_cli::pattern::PatternResolver;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let mut resolver = PatternResolver::new();
/// resolver.exclude("drafts/**")?;
///
/// let files = resolver.resolve("**/*.html", Path::new("layouts/partials"))?;
/// # Ok(())
/// # }
/// ```
pub struct PatternResolver {
    /// Patterns to exclude from matching
    exclude_patterns: Vec<Pattern>,
}

impl PatternResolver {
    /// Creates a resolver with no exclusions.
    pub const fn new() -> Self {
        Self {
            exclude_patterns: Vec::new(),
        }
    }

    /// Adds an exclusion pattern, matched against paths relative to the base.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is invalid glob syntax.
    pub fn exclude(&mut self, pattern: &str) -> Result<()> {
        let pattern = Pattern::new(pattern)
            .with_context(|| format!("Invalid exclusion pattern: {pattern}"))?;
        self.exclude_patterns.push(pattern);
        Ok(())
    }

    /// Finds files matching `pattern`, drops excluded ones and sorts the rest.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is invalid or `base_path` is not accessible.
    pub fn resolve(&self, pattern: &str, base_path: &Path) -> Result<Vec<PathBuf>> {
        let matcher = PatternMatcher::new(pattern)?;
        let mut matches = matcher.find_matches(base_path)?;

        if !self.exclude_patterns.is_empty() {
            matches.retain(|path| {
                let path_str = path.to_string_lossy();
                !self.exclude_patterns.iter().any(|exclude| exclude.matches(&path_str))
            });
        }

        // Sort for deterministic ordering
        matches.sort();

        Ok(matches)
    }
}

impl Default for PatternResolver {
    fn default() -> Self {
        Self::new()
    }
}
