//! The frozen dependency graph of a partials set.
//!
//! [`DependencyGraph`] ties the pipeline together: it extracts every partial's
//! references, indexes the keys, and answers closure, reverse-lookup,
//! diagnostic and fingerprint queries over the result. Nothing is mutated
//! after construction, so the graph is `Send + Sync` and per-partial work is
//! spread over rayon's thread pool.
//!
//! Alongside the key index the graph keeps a petgraph [`DiGraph`] whose edges
//! are the *resolved* direct references. Reachability in that graph is the
//! same relation the closure resolver computes, which lets reverse lookups
//! and cycle detection use plain graph algorithms.

use indexmap::IndexMap;
use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, warn};

use super::closure::ClosureResolver;
use super::diagnostics::{AmbiguousReference, Diagnostics, UnresolvedReference, similar_keys};
use super::fingerprint::fingerprint;
use super::key_index::{KeyId, KeyIndex};
use super::shaper::shape;
use crate::core::{PartialDependencies, PartialKey, PartialSource, PdepsError, ResolvedDependency};
use crate::extractor::{self, unwrap_reference};
use crate::pattern::KeyMatcher;

/// Read-only graph of partials and their references.
pub struct DependencyGraph {
    index: KeyIndex,
    /// Source text by key id
    sources: Vec<String>,
    /// Distinct resolved direct references by key id, self excluded
    direct: Vec<Vec<KeyId>>,
    /// Resolved edges; node `i` is key id `i`
    graph: DiGraph<KeyId, ()>,
    /// Per key id: true when the partial's strongly connected component is
    /// itself alone (a self-reference does not count)
    acyclic: Vec<bool>,
}

impl DependencyGraph {
    /// Build the graph from partial sources in discovery order.
    ///
    /// Sources whose segments do not form a valid key are skipped with a
    /// warning, as are later sources repeating an earlier key.
    pub fn from_sources(
        sources: impl IntoIterator<Item = PartialSource>,
        matcher: Arc<dyn KeyMatcher>,
    ) -> Self {
        let sources: Vec<PartialSource> = sources.into_iter().collect();

        let extracted: Vec<(extractor::DependencyRecord, &str)> = sources
            .par_iter()
            .filter_map(|source| match extractor::extract(source) {
                Ok(record) => Some((record, source.content.as_str())),
                Err(e) => {
                    warn!("Skipping partial {}: {}", source.display_path(), e);
                    None
                }
            })
            .collect();

        let mut contents: HashMap<PartialKey, &str> = HashMap::with_capacity(extracted.len());
        let mut records = Vec::with_capacity(extracted.len());
        for (record, content) in extracted {
            contents.entry(record.key.clone()).or_insert(content);
            records.push(record);
        }

        let index = KeyIndex::new(records, matcher);
        let sources: Vec<String> = index
            .keys()
            .map(|key| contents.get(key).map(|c| (*c).to_string()).unwrap_or_default())
            .collect();

        Self::assemble(index, sources)
    }

    fn assemble(index: KeyIndex, sources: Vec<String>) -> Self {
        let direct: Vec<Vec<KeyId>> = (0..index.len())
            .into_par_iter()
            .map(|id| {
                let mut seen = HashSet::new();
                index
                    .references(id)
                    .iter()
                    .filter_map(|reference| index.resolve_id(reference))
                    .filter(|target| seen.insert(*target))
                    .collect()
            })
            .collect();

        let mut graph = DiGraph::with_capacity(index.len(), 0);
        for id in 0..index.len() {
            graph.add_node(id);
        }
        for (from, targets) in direct.iter().enumerate() {
            for to in targets {
                graph.add_edge(NodeIndex::new(from), NodeIndex::new(*to), ());
            }
        }

        let direct: Vec<Vec<KeyId>> = direct
            .into_iter()
            .enumerate()
            .map(|(id, targets)| targets.into_iter().filter(|t| *t != id).collect())
            .collect();

        let mut acyclic = vec![false; index.len()];
        for component in tarjan_scc(&graph) {
            if let [node] = component.as_slice() {
                acyclic[node.index()] = true;
            }
        }

        debug!(
            "Built dependency graph with {} partials and {} resolved edges",
            graph.node_count(),
            graph.edge_count()
        );

        Self {
            index,
            sources,
            direct,
            graph,
            acyclic,
        }
    }

    /// Number of partials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the graph holds no partials.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Partial keys in discovery order.
    pub fn keys(&self) -> impl Iterator<Item = &PartialKey> {
        self.index.keys()
    }

    /// The underlying key index.
    #[must_use]
    pub const fn index(&self) -> &KeyIndex {
        &self.index
    }

    /// Look up a partial by exact key.
    ///
    /// # Errors
    ///
    /// Returns [`PdepsError::PartialNotFound`] with spelling suggestions when
    /// the key is unknown.
    pub fn id_of(&self, key: &str) -> Result<KeyId, PdepsError> {
        self.index.id_of(key).ok_or_else(|| PdepsError::PartialNotFound {
            key: key.to_string(),
            suggestions: similar_keys(key, self.keys().map(PartialKey::as_str)),
        })
    }

    /// The key at `id`.
    #[must_use]
    pub fn key(&self, id: KeyId) -> Option<&PartialKey> {
        self.index.key(id)
    }

    /// Transitive dependencies of one partial, as keys in discovery order.
    ///
    /// # Errors
    ///
    /// See [`DependencyGraph::id_of`].
    pub fn closure(&self, key: &str) -> Result<Vec<&PartialKey>, PdepsError> {
        let id = self.id_of(key)?;
        Ok(self.closure_keys(id))
    }

    fn closure_keys(&self, id: KeyId) -> Vec<&PartialKey> {
        self.resolver()
            .closure_of(id)
            .into_iter()
            .filter_map(|dep| self.index.key(dep))
            .collect()
    }

    /// Transitive dependencies of one partial, shaped for callers.
    ///
    /// # Errors
    ///
    /// See [`DependencyGraph::id_of`].
    pub fn resolve(&self, key: &str) -> Result<Vec<ResolvedDependency>, PdepsError> {
        Ok(shape(self.closure(key)?))
    }

    /// Transitive dependencies of every partial, keyed in discovery order.
    ///
    /// Partials are resolved in parallel; the output order does not depend on
    /// scheduling.
    #[must_use]
    pub fn resolve_all(&self) -> PartialDependencies {
        let resolved: Vec<Vec<ResolvedDependency>> = (0..self.len())
            .into_par_iter()
            .map(|id| shape(self.closure_keys(id)))
            .collect();

        self.index.keys().map(|key| key.to_string()).zip(resolved).collect()
    }

    /// Distinct partials referenced directly by `key`, in reference order.
    ///
    /// # Errors
    ///
    /// See [`DependencyGraph::id_of`].
    pub fn direct_dependencies(&self, key: &str) -> Result<Vec<&PartialKey>, PdepsError> {
        let id = self.id_of(key)?;
        Ok(self.direct_ids(id).iter().filter_map(|dep| self.index.key(*dep)).collect())
    }

    /// Distinct resolved direct references of `id`, self excluded.
    #[must_use]
    pub fn direct_ids(&self, id: KeyId) -> &[KeyId] {
        self.direct.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Partials that reference `key` directly, in discovery order.
    ///
    /// # Errors
    ///
    /// See [`DependencyGraph::id_of`].
    pub fn dependents(&self, key: &str) -> Result<Vec<&PartialKey>, PdepsError> {
        let id = self.id_of(key)?;
        Ok(self.dependent_ids(id).into_iter().filter_map(|dep| self.index.key(dep)).collect())
    }

    /// Direct dependents of `id` in discovery order, self excluded.
    #[must_use]
    pub fn dependent_ids(&self, id: KeyId) -> Vec<KeyId> {
        let mut ids: Vec<KeyId> = self
            .graph
            .neighbors_directed(NodeIndex::new(id), Direction::Incoming)
            .map(NodeIndex::index)
            .filter(|dep| *dep != id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Rebuild scope for a set of changed partials.
    ///
    /// Returns every partial whose closure contains a changed key, together
    /// with the changed keys themselves, in discovery order. Keys that are
    /// not in the graph are ignored.
    pub fn affected<S: AsRef<str>>(&self, changed: &[S]) -> Vec<&PartialKey> {
        let mut marked = vec![false; self.len()];
        let mut queue = VecDeque::new();

        for key in changed {
            match self.index.id_of(key.as_ref()) {
                Some(id) => {
                    if !marked[id] {
                        marked[id] = true;
                        queue.push_back(id);
                    }
                }
                None => debug!("Changed key '{}' is not a known partial", key.as_ref()),
            }
        }

        while let Some(current) = queue.pop_front() {
            for dependent in
                self.graph.neighbors_directed(NodeIndex::new(current), Direction::Incoming)
            {
                let dependent = dependent.index();
                if !marked[dependent] {
                    marked[dependent] = true;
                    queue.push_back(dependent);
                }
            }
        }

        marked
            .iter()
            .enumerate()
            .filter(|(_, hit)| **hit)
            .filter_map(|(id, _)| self.index.key(id))
            .collect()
    }

    /// Inspect the graph for unresolved references, ambiguous references and
    /// cycles.
    #[must_use]
    pub fn diagnose(&self) -> Diagnostics {
        let per_owner: Vec<(Vec<UnresolvedReference>, Vec<AmbiguousReference>)> = (0..self.len())
            .into_par_iter()
            .map(|id| self.diagnose_references(id))
            .collect();

        let mut diagnostics = Diagnostics {
            partials: self.len(),
            ..Diagnostics::default()
        };
        for (unresolved, ambiguous) in per_owner {
            diagnostics.unresolved.extend(unresolved);
            diagnostics.ambiguous.extend(ambiguous);
        }
        diagnostics.cycles = self.cycles();
        diagnostics
    }

    fn diagnose_references(
        &self,
        id: KeyId,
    ) -> (Vec<UnresolvedReference>, Vec<AmbiguousReference>) {
        let mut unresolved = Vec::new();
        let mut ambiguous = Vec::new();
        let Some(owner) = self.index.key(id) else {
            return (unresolved, ambiguous);
        };

        let mut seen = HashSet::new();
        for reference in self.index.references(id) {
            if !seen.insert(reference.as_str()) {
                continue;
            }
            let written = unwrap_reference(reference);
            let candidates = self.index.candidates(reference);

            match candidates.split_first() {
                None => unresolved.push(UnresolvedReference {
                    owner: owner.to_string(),
                    reference: written.to_string(),
                    suggestions: similar_keys(
                        strip_extension(written),
                        self.keys().map(PartialKey::as_str),
                    ),
                }),
                Some((chosen, others)) if !others.is_empty() => {
                    ambiguous.push(AmbiguousReference {
                        owner: owner.to_string(),
                        reference: written.to_string(),
                        chosen: self.key_string(*chosen),
                        others: others.iter().map(|other| self.key_string(*other)).collect(),
                    });
                }
                Some(_) => {}
            }
        }

        (unresolved, ambiguous)
    }

    /// Reference cycles: strongly connected components with more than one
    /// partial, or a single partial that references itself. Members and
    /// cycles are listed in discovery order.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut components: Vec<Vec<KeyId>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component.first().is_some_and(|n| self.graph.contains_edge(*n, *n))
            })
            .map(|component| {
                let mut ids: Vec<KeyId> = component.into_iter().map(NodeIndex::index).collect();
                ids.sort_unstable();
                ids
            })
            .collect();
        components.sort();

        components
            .into_iter()
            .map(|ids| ids.into_iter().map(|id| self.key_string(id)).collect())
            .collect()
    }

    /// Content fingerprint of a partial and its closure.
    ///
    /// # Errors
    ///
    /// See [`DependencyGraph::id_of`].
    pub fn fingerprint(&self, key: &str) -> Result<String, PdepsError> {
        let id = self.id_of(key)?;
        Ok(self.fingerprint_of(id))
    }

    /// Fingerprints of every partial, keyed in discovery order.
    #[must_use]
    pub fn fingerprints(&self) -> IndexMap<String, String> {
        let prints: Vec<String> =
            (0..self.len()).into_par_iter().map(|id| self.fingerprint_of(id)).collect();
        self.index.keys().map(|key| key.to_string()).zip(prints).collect()
    }

    fn fingerprint_of(&self, id: KeyId) -> String {
        let source = |id: KeyId| self.sources.get(id).map_or("", String::as_str);
        let root = (self.index.key(id).map_or("", PartialKey::as_str), source(id));
        let members = self
            .resolver()
            .closure_of(id)
            .into_iter()
            .filter_map(|dep| self.index.key(dep).map(|key| (key.as_str(), source(dep))));
        fingerprint(root, members)
    }

    fn resolver(&self) -> ClosureResolver<'_> {
        ClosureResolver::new(&self.index).with_acyclic(&self.acyclic)
    }

    fn key_string(&self, id: KeyId) -> String {
        self.index.key(id).map(ToString::to_string).unwrap_or_default()
    }
}

/// Strip a trailing file extension from the last segment of an identifier.
fn strip_extension(identifier: &str) -> &str {
    match identifier.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.contains('/') => stem,
        _ => identifier,
    }
}

impl std::fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("index", &self.index)
            .field("edges", &self.graph.edge_count())
            .finish_non_exhaustive()
    }
}
