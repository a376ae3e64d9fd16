//! Lookup from identifier patterns to canonical partial keys.
//!
//! The index keeps every partial's direct references in discovery order and
//! answers one question: which single key does an identifier denote? The
//! answer is the *first* key, in discovery order, that the configured
//! [`KeyMatcher`] accepts. Ambiguous identifiers therefore always resolve to
//! the earliest-discovered partial, which keeps results stable across runs
//! with the same input order.
//!
//! Every reference that occurs in the graph is resolved once when the index
//! is built, so lookups during closure resolution are plain map reads.

use indexmap::IndexMap;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{trace, warn};

use crate::core::PartialKey;
use crate::extractor::DependencyRecord;
use crate::pattern::KeyMatcher;

/// Position of a key in discovery order.
pub type KeyId = usize;

/// Identifier-to-key index over a frozen set of dependency records.
pub struct KeyIndex {
    records: IndexMap<PartialKey, Vec<String>>,
    matcher: Arc<dyn KeyMatcher>,
    resolved: HashMap<String, Option<KeyId>>,
}

impl KeyIndex {
    /// Build the index from records in discovery order.
    ///
    /// When two records share a key, the first one wins and the later one is
    /// dropped with a warning.
    pub fn new(
        records: impl IntoIterator<Item = DependencyRecord>,
        matcher: Arc<dyn KeyMatcher>,
    ) -> Self {
        let mut map: IndexMap<PartialKey, Vec<String>> = IndexMap::new();
        for record in records {
            if map.contains_key(&record.key) {
                warn!("Duplicate partial key '{}', keeping the first occurrence", record.key);
                continue;
            }
            map.insert(record.key, record.references);
        }

        let mut index = Self {
            records: map,
            matcher,
            resolved: HashMap::new(),
        };

        let mut distinct: Vec<&str> =
            index.records.values().flatten().map(String::as_str).collect();
        distinct.sort_unstable();
        distinct.dedup();

        let resolved: HashMap<String, Option<KeyId>> = distinct
            .par_iter()
            .map(|reference| (reference.to_string(), index.scan(reference)))
            .collect();
        index.resolved = resolved;
        index
    }

    /// Number of partials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index holds no partials.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keys in discovery order.
    pub fn keys(&self) -> impl Iterator<Item = &PartialKey> {
        self.records.keys()
    }

    /// The key at a discovery position.
    #[must_use]
    pub fn key(&self, id: KeyId) -> Option<&PartialKey> {
        self.records.get_index(id).map(|(key, _)| key)
    }

    /// The discovery position of an exact key.
    #[must_use]
    pub fn id_of(&self, key: &str) -> Option<KeyId> {
        self.records.get_index_of(key)
    }

    /// Direct references of the partial at `id` (empty for unknown ids).
    #[must_use]
    pub fn references(&self, id: KeyId) -> &[String] {
        self.records.get_index(id).map(|(_, refs)| refs.as_slice()).unwrap_or_default()
    }

    /// Direct references of a partial by exact key.
    #[must_use]
    pub fn record(&self, key: &str) -> Option<&[String]> {
        self.records.get(key).map(Vec::as_slice)
    }

    /// Resolve an identifier to the position of the first matching key.
    #[must_use]
    pub fn resolve_id(&self, identifier: &str) -> Option<KeyId> {
        match self.resolved.get(identifier) {
            Some(cached) => *cached,
            None => self.scan(identifier),
        }
    }

    /// Resolve an identifier to the first matching key.
    #[must_use]
    pub fn resolve(&self, identifier: &str) -> Option<&PartialKey> {
        self.resolve_id(identifier).and_then(|id| self.key(id))
    }

    /// Every key the identifier matches, in discovery order.
    #[must_use]
    pub fn candidates(&self, identifier: &str) -> Vec<KeyId> {
        self.records
            .keys()
            .enumerate()
            .filter(|(_, key)| self.matcher.matches(identifier, key.as_str()))
            .map(|(id, _)| id)
            .collect()
    }

    fn scan(&self, identifier: &str) -> Option<KeyId> {
        let found = self
            .records
            .keys()
            .position(|key| self.matcher.matches(identifier, key.as_str()));
        trace!(
            "Reference '{}' resolved to {}",
            identifier,
            found.and_then(|id| self.key(id)).map_or("<no match>", PartialKey::as_str)
        );
        found
    }
}

impl fmt::Debug for KeyIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyIndex")
            .field("records", &self.records)
            .field("resolved", &self.resolved.len())
            .finish_non_exhaustive()
    }
}
