//! Graph health report: unresolved references, ambiguous references and cycles.
//!
//! None of these conditions stop resolution. An unresolved reference simply
//! contributes nothing, an ambiguous one resolves to the earliest-discovered
//! key, and cycles are cut by the path guard. The report exists so that users
//! can find typos and surprising matches in their templates.

use serde::Serialize;
use strsim::levenshtein;

use crate::constants::{MAX_SUGGESTIONS, SIMILARITY_THRESHOLD_PERCENT};

/// A reference that matched no partial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedReference {
    /// Partial containing the reference
    pub owner: String,
    /// The identifier as written (without wildcard wrapping)
    pub reference: String,
    /// Closest known keys
    pub suggestions: Vec<String>,
}

/// A reference that matched more than one partial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmbiguousReference {
    /// Partial containing the reference
    pub owner: String,
    /// The identifier as written (without wildcard wrapping)
    pub reference: String,
    /// The key the reference resolves to
    pub chosen: String,
    /// The other matching keys, in discovery order
    pub others: Vec<String>,
}

/// Everything `validate` reports about a dependency graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Number of partials inspected
    pub partials: usize,
    /// References that resolve to nothing
    pub unresolved: Vec<UnresolvedReference>,
    /// References with more than one matching partial
    pub ambiguous: Vec<AmbiguousReference>,
    /// Reference cycles, each listed in discovery order
    pub cycles: Vec<Vec<String>>,
}

impl Diagnostics {
    /// True when nothing was reported.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty() && self.ambiguous.is_empty() && self.cycles.is_empty()
    }

    /// Total number of reported issues.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.unresolved.len() + self.ambiguous.len() + self.cycles.len()
    }
}

/// Find keys similar to `target` by Levenshtein distance.
///
/// Returns at most [`MAX_SUGGESTIONS`] keys whose distance is within
/// [`SIMILARITY_THRESHOLD_PERCENT`] of the target length, closest first.
/// Ties keep the order of `available`.
pub fn similar_keys<'a, I>(target: &str, available: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let limit = target.len() * SIMILARITY_THRESHOLD_PERCENT / 100;

    let mut scored: Vec<(&str, usize)> =
        available.into_iter().map(|key| (key, levenshtein(target, key))).collect();

    // Stable sort keeps discovery order among equal distances
    scored.sort_by_key(|(_, dist)| *dist);

    scored
        .into_iter()
        .filter(|(_, dist)| *dist <= limit)
        .take(MAX_SUGGESTIONS)
        .map(|(key, _)| key.to_string())
        .collect()
}
