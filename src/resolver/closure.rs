//! Transitive closure over partial references.
//!
//! The resolver follows references depth-first through the [`KeyIndex`]. Each
//! frame on the worklist carries the keys on the path that led to it; a
//! reference resolving to a key already on that path contributes nothing.
//! This breaks cycles (`A -> B -> A`) while still letting a partial be reached
//! again through a different, non-cyclic path. Results are deduplicated in
//! first-discovery order, which is the preorder of the equivalent recursive
//! walk.
//!
//! A frame is fully determined by its key and the set of keys on its path, so
//! frames already expanded with the same pair are skipped. On its own this
//! memo does not bound the work: the number of distinct path sets can grow
//! exponentially with depth (two partials per layer, each referencing both
//! partials of the next layer). A partial that lies on no cycle can never meet
//! its own path again, so its expansion does not depend on the path at all.
//! When the caller supplies that information through
//! [`ClosureResolver::with_acyclic`], such partials are expanded at most once
//! per closure, which keeps acyclic graphs linear.

use std::collections::HashSet;
use std::rc::Rc;

use super::key_index::{KeyId, KeyIndex};

struct Frame<'a> {
    reference: &'a str,
    path: Rc<[KeyId]>,
}

/// Computes reachable partials for a frozen [`KeyIndex`].
#[derive(Debug, Clone, Copy)]
pub struct ClosureResolver<'a> {
    index: &'a KeyIndex,
    /// Per key id: true when the partial lies on no reference cycle
    acyclic: &'a [bool],
}

impl<'a> ClosureResolver<'a> {
    /// Resolver over `index`.
    #[must_use]
    pub const fn new(index: &'a KeyIndex) -> Self {
        Self {
            index,
            acyclic: &[],
        }
    }

    /// Mark the partials that lie on no cycle, indexed by key id.
    ///
    /// A self-reference alone does not make a partial cyclic. Flagging a
    /// partial that shares a cycle with others gives wrong closures; ids
    /// outside the slice are treated as cyclic.
    #[must_use]
    pub const fn with_acyclic(mut self, acyclic: &'a [bool]) -> Self {
        self.acyclic = acyclic;
        self
    }

    /// Everything reachable from the partial at `id`, excluding the partial
    /// itself.
    #[must_use]
    pub fn closure_of(&self, id: KeyId) -> Vec<KeyId> {
        let references = self.index.references(id).iter().map(String::as_str);
        self.expand(references, Rc::from(vec![id]))
    }

    /// Everything reachable from a single reference: the key it resolves to
    /// followed by that key's closure. An unresolved reference yields nothing.
    #[must_use]
    pub fn resolve_reference(&self, reference: &'a str) -> Vec<KeyId> {
        self.expand(std::iter::once(reference), Rc::from(Vec::new()))
    }

    fn expand<I>(&self, roots: I, base: Rc<[KeyId]>) -> Vec<KeyId>
    where
        I: DoubleEndedIterator<Item = &'a str>,
    {
        let mut ordered = Vec::new();
        let mut seen = HashSet::new();
        let mut expanded: HashSet<(KeyId, Vec<KeyId>)> = HashSet::new();

        let mut stack: Vec<Frame<'a>> = roots
            .rev()
            .map(|reference| Frame {
                reference,
                path: Rc::clone(&base),
            })
            .collect();

        while let Some(frame) = stack.pop() {
            let Some(id) = self.index.resolve_id(frame.reference) else {
                continue;
            };
            if frame.path.contains(&id) {
                continue;
            }

            if seen.insert(id) {
                ordered.push(id);
            }

            let frozen = if self.is_acyclic(id) {
                Vec::new()
            } else {
                let mut frozen = frame.path.to_vec();
                frozen.sort_unstable();
                frozen
            };
            if !expanded.insert((id, frozen)) {
                continue;
            }

            let mut path = frame.path.to_vec();
            path.push(id);
            let path: Rc<[KeyId]> = Rc::from(path);

            // Reverse push keeps source order when popping.
            for reference in self.index.references(id).iter().rev() {
                stack.push(Frame {
                    reference,
                    path: Rc::clone(&path),
                });
            }
        }

        ordered
    }

    fn is_acyclic(&self, id: KeyId) -> bool {
        self.acyclic.get(id).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PartialKey;
    use crate::extractor::DependencyRecord;
    use crate::pattern::ContainsMatcher;
    use std::sync::Arc;

    fn index(entries: &[(&str, &[&str])]) -> KeyIndex {
        let records = entries.iter().map(|(key, refs)| DependencyRecord {
            key: PartialKey::parse(key).unwrap(),
            references: refs.iter().map(|r| format!("*{r}*")).collect(),
        });
        KeyIndex::new(records, Arc::new(ContainsMatcher))
    }

    fn names(index: &KeyIndex, ids: &[KeyId]) -> Vec<String> {
        ids.iter().map(|id| index.key(*id).unwrap().to_string()).collect()
    }

    #[test]
    fn test_transitive_chain() {
        let idx = index(&[("p/a", &["p/b"]), ("p/b", &["p/c"]), ("p/c", &[])]);
        let resolver = ClosureResolver::new(&idx);

        assert_eq!(names(&idx, &resolver.closure_of(0)), ["p/b", "p/c"]);
        assert_eq!(names(&idx, &resolver.closure_of(1)), ["p/c"]);
        assert!(resolver.closure_of(2).is_empty());
    }

    #[test]
    fn test_two_node_cycle_terminates() {
        let idx = index(&[("p/a", &["p/b"]), ("p/b", &["p/a"])]);
        let resolver = ClosureResolver::new(&idx);

        assert_eq!(names(&idx, &resolver.closure_of(0)), ["p/b"]);
        assert_eq!(names(&idx, &resolver.closure_of(1)), ["p/a"]);
    }

    #[test]
    fn test_self_reference_is_excluded() {
        let idx = index(&[("p/a", &["p/a", "p/b"]), ("p/b", &["p/a"])]);
        let resolver = ClosureResolver::new(&idx);

        assert_eq!(names(&idx, &resolver.closure_of(0)), ["p/b"]);
    }

    #[test]
    fn test_longer_cycle() {
        let idx = index(&[("p/a", &["p/b"]), ("p/b", &["p/c"]), ("p/c", &["p/a"])]);
        let resolver = ClosureResolver::new(&idx);

        assert_eq!(names(&idx, &resolver.closure_of(0)), ["p/b", "p/c"]);
        assert_eq!(names(&idx, &resolver.closure_of(2)), ["p/a", "p/b"]);
    }

    #[test]
    fn test_diamond_is_deduplicated() {
        // a -> b, a -> c -> b
        let idx = index(&[("p/a", &["p/b", "p/c"]), ("p/b", &[]), ("p/c", &["p/b"])]);
        let resolver = ClosureResolver::new(&idx);

        assert_eq!(names(&idx, &resolver.closure_of(0)), ["p/b", "p/c"]);
    }

    #[test]
    fn test_revisit_through_non_cyclic_path_reaches_descendants() {
        // a -> b -> d, a -> c -> b; d must be found via either path
        let idx = index(&[
            ("p/a", &["p/c", "p/b"]),
            ("p/b", &["p/d"]),
            ("p/c", &["p/b"]),
            ("p/d", &[]),
        ]);
        let resolver = ClosureResolver::new(&idx);

        assert_eq!(names(&idx, &resolver.closure_of(0)), ["p/c", "p/b", "p/d"]);
    }

    #[test]
    fn test_unresolved_references_contribute_nothing() {
        let idx = index(&[("p/a", &["p/missing", "p/b"]), ("p/b", &["nowhere/else"])]);
        let resolver = ClosureResolver::new(&idx);

        assert_eq!(names(&idx, &resolver.closure_of(0)), ["p/b"]);
    }

    #[test]
    fn test_resolve_reference_includes_target() {
        let idx = index(&[("p/a", &["p/b"]), ("p/b", &["p/c"]), ("p/c", &[])]);
        let resolver = ClosureResolver::new(&idx);

        assert_eq!(names(&idx, &resolver.resolve_reference("*p/b*")), ["p/b", "p/c"]);
        assert!(resolver.resolve_reference("*p/zzz*").is_empty());
    }

    fn ladder(depth: usize) -> (Vec<String>, Vec<Vec<String>>) {
        let keys: Vec<String> = (0..depth)
            .flat_map(|layer| [format!("l{layer:02}/a"), format!("l{layer:02}/b")])
            .collect();
        let refs = (0..keys.len())
            .map(|i| {
                let next = (i / 2 + 1) * 2;
                keys.get(next..next + 2).map(<[String]>::to_vec).unwrap_or_default()
            })
            .collect();
        (keys, refs)
    }

    #[test]
    fn test_acyclic_ladder_is_expanded_once_per_key() {
        // Each layer references both partials of the next one: 2^40 paths.
        let (keys, refs) = ladder(40);
        let entries: Vec<(&str, Vec<&str>)> = keys
            .iter()
            .zip(&refs)
            .map(|(k, r)| (k.as_str(), r.iter().map(String::as_str).collect()))
            .collect();
        let entries: Vec<(&str, &[&str])> =
            entries.iter().map(|(k, r)| (*k, r.as_slice())).collect();
        let idx = index(&entries);
        let acyclic = vec![true; idx.len()];
        let resolver = ClosureResolver::new(&idx).with_acyclic(&acyclic);

        let closure = resolver.closure_of(0);
        assert_eq!(closure.len(), keys.len() - 2);
        assert_eq!(names(&idx, &closure)[..3], ["l01/a", "l02/a", "l03/a"]);
    }

    #[test]
    fn test_acyclic_flags_do_not_change_results() {
        // a -> c -> b -> d, a -> b; d <-> e is the only cycle
        let idx = index(&[
            ("p/a", &["p/c", "p/b"]),
            ("p/b", &["p/d"]),
            ("p/c", &["p/b"]),
            ("p/d", &["p/e"]),
            ("p/e", &["p/d"]),
        ]);
        let acyclic = [true, true, true, false, false];
        let plain = ClosureResolver::new(&idx);
        let flagged = ClosureResolver::new(&idx).with_acyclic(&acyclic);

        for id in 0..idx.len() {
            assert_eq!(plain.closure_of(id), flagged.closure_of(id), "closure of {id}");
        }
        assert_eq!(names(&idx, &flagged.closure_of(0)), ["p/c", "p/b", "p/d", "p/e"]);
        assert_eq!(names(&idx, &flagged.closure_of(3)), ["p/e"]);
    }

    #[test]
    fn test_dense_graph_completes() {
        // Every node references every later node: many paths, one answer.
        let keys: Vec<String> = (0..14).map(|i| format!("p/n{i:02}")).collect();
        let refs: Vec<Vec<&str>> = (0..keys.len())
            .map(|i| keys[i + 1..].iter().map(String::as_str).collect())
            .collect();
        let entries: Vec<(&str, &[&str])> =
            keys.iter().zip(&refs).map(|(k, r)| (k.as_str(), r.as_slice())).collect();
        let idx = index(&entries);
        let resolver = ClosureResolver::new(&idx);

        assert_eq!(resolver.closure_of(0).len(), keys.len() - 1);
    }
}
