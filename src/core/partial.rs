//! The partial data model.
//!
//! A partial is identified by a [`PartialKey`] of the form `type/entry`, where
//! the type is the name of the directory holding the partial file and the
//! entry is the file stem. Keys are produced once, when a [`PartialSource`] is
//! turned into a graph record, and split back into [`ResolvedDependency`]
//! descriptors when results are shaped for callers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::path::{Path, PathBuf};

use super::error::PdepsError;

/// Separator between the type and entry segments of a [`PartialKey`].
pub const KEY_SEPARATOR: char = '/';

/// Canonical identifier of a partial, `type/entry`.
///
/// The type segment never contains [`KEY_SEPARATOR`], so splitting a key on
/// its first separator always yields the segments it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartialKey(String);

impl PartialKey {
    /// Build a key from its type and entry segments.
    ///
    /// # Errors
    ///
    /// Returns [`PdepsError::InvalidPartialKey`] when the type segment contains
    /// the separator.
    pub fn new(partial_type: &str, entry: &str) -> Result<Self, PdepsError> {
        if partial_type.contains(KEY_SEPARATOR) {
            return Err(PdepsError::InvalidPartialKey {
                key: format!("{partial_type}{KEY_SEPARATOR}{entry}"),
                reason: format!("type segment must not contain '{KEY_SEPARATOR}'"),
            });
        }
        Ok(Self(format!("{partial_type}{KEY_SEPARATOR}{entry}")))
    }

    /// Parse a `type/entry` string.
    ///
    /// # Errors
    ///
    /// Returns [`PdepsError::InvalidPartialKey`] when the separator is missing.
    pub fn parse(key: &str) -> Result<Self, PdepsError> {
        match key.split_once(KEY_SEPARATOR) {
            Some((partial_type, entry)) => Self::new(partial_type, entry),
            None => Err(PdepsError::InvalidPartialKey {
                key: key.to_string(),
                reason: format!("expected <type>{KEY_SEPARATOR}<entry>"),
            }),
        }
    }

    /// The full key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The type segment (containing directory name).
    #[must_use]
    pub fn partial_type(&self) -> &str {
        self.segments().0
    }

    /// The entry segment (file stem).
    #[must_use]
    pub fn entry(&self) -> &str {
        self.segments().1
    }

    fn segments(&self) -> (&str, &str) {
        // Constructors guarantee the separator is present.
        self.0.split_once(KEY_SEPARATOR).unwrap_or((self.0.as_str(), ""))
    }
}

impl fmt::Display for PartialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PartialKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PartialKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One partial as handed to the resolver: its identifying segments and source text.
///
/// `path` is informational (used in log messages); resolution only looks at the
/// segments and the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialSource {
    /// Containing directory name
    pub partial_type: String,
    /// File stem
    pub entry: String,
    /// Raw template source
    pub content: String,
    /// File the source was read from, if any
    pub path: Option<PathBuf>,
}

impl PartialSource {
    /// Create a source with no backing file.
    pub fn new(
        partial_type: impl Into<String>,
        entry: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            partial_type: partial_type.into(),
            entry: entry.into(),
            content: content.into(),
            path: None,
        }
    }

    /// Attach the file path the content was read from.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// The canonical key of this partial.
    ///
    /// # Errors
    ///
    /// See [`PartialKey::new`].
    pub fn key(&self) -> Result<PartialKey, PdepsError> {
        PartialKey::new(&self.partial_type, &self.entry)
    }

    /// Path for display, falling back to the key text.
    #[must_use]
    pub fn display_path(&self) -> String {
        self.path.as_deref().map_or_else(
            || format!("{}{KEY_SEPARATOR}{}", self.partial_type, self.entry),
            |p: &Path| p.display().to_string(),
        )
    }
}

/// A dependency as returned to callers: the two segments of a [`PartialKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResolvedDependency {
    /// Type segment
    #[serde(rename = "type")]
    pub partial_type: String,
    /// Entry segment
    pub entry: String,
}

impl ResolvedDependency {
    /// Re-join the segments into `type/entry`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}{KEY_SEPARATOR}{}", self.partial_type, self.entry)
    }
}

impl fmt::Display for ResolvedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{KEY_SEPARATOR}{}", self.partial_type, self.entry)
    }
}

/// Resolution output: every partial key (discovery order) mapped to its
/// transitive dependencies.
pub type PartialDependencies = IndexMap<String, Vec<ResolvedDependency>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_key_segments() {
        let key = PartialKey::new("components", "card").unwrap();
        assert_eq!(key.as_str(), "components/card");
        assert_eq!(key.partial_type(), "components");
        assert_eq!(key.entry(), "card");
        assert_eq!(key.to_string(), "components/card");
    }

    #[test]
    fn test_partial_key_rejects_separator_in_type() {
        let err = PartialKey::new("a/b", "c").unwrap_err();
        assert!(matches!(err, PdepsError::InvalidPartialKey { .. }));
    }

    #[test]
    fn test_partial_key_parse() {
        let key = PartialKey::parse("cards/item").unwrap();
        assert_eq!(key.partial_type(), "cards");
        assert_eq!(key.entry(), "item");

        assert!(PartialKey::parse("no-separator").is_err());
    }

    #[test]
    fn test_entry_may_contain_separator_and_round_trips() {
        // Only the first separator splits, so entries with '/' survive a round trip.
        let key = PartialKey::new("cards", "nested/item").unwrap();
        assert_eq!(PartialKey::parse(key.as_str()).unwrap(), key);
        assert_eq!(key.entry(), "nested/item");
    }

    #[test]
    fn test_resolved_dependency_serializes_with_type_field() {
        let dep = ResolvedDependency {
            partial_type: "cards".to_string(),
            entry: "item".to_string(),
        };
        let json = serde_json::to_string(&dep).unwrap();
        assert_eq!(json, r#"{"type":"cards","entry":"item"}"#);
        assert_eq!(dep.key(), "cards/item");
    }

    #[test]
    fn test_partial_source_display_path() {
        let source = PartialSource::new("cards", "item", "");
        assert_eq!(source.display_path(), "cards/item");

        let source = source.with_path("layouts/partials/cards/item.html");
        assert_eq!(source.display_path(), "layouts/partials/cards/item.html");
    }
}
