//! Conversion of resolved keys into caller-facing descriptors.

use crate::core::{KEY_SEPARATOR, PartialKey, ResolvedDependency};

/// Split a key on its first separator into a [`ResolvedDependency`].
///
/// A string without a separator becomes a dependency with an empty entry.
#[must_use]
pub fn split_key(key: &str) -> ResolvedDependency {
    let (partial_type, entry) = key.split_once(KEY_SEPARATOR).unwrap_or((key, ""));
    ResolvedDependency {
        partial_type: partial_type.to_string(),
        entry: entry.to_string(),
    }
}

/// Shape an ordered, deduplicated key sequence. Order is preserved.
pub fn shape<'a, I>(keys: I) -> Vec<ResolvedDependency>
where
    I: IntoIterator<Item = &'a PartialKey>,
{
    keys.into_iter()
        .map(|key| ResolvedDependency {
            partial_type: key.partial_type().to_string(),
            entry: key.entry().to_string(),
        })
        .collect()
}
