//! Dependency resolution for template partials.
//!
//! This module turns a set of partial sources into the transitive dependency
//! mapping that a cache-invalidation or incremental-rebuild step consumes.
//!
//! # Pipeline
//!
//! Resolution runs in four stages, leaves first:
//!
//! 1. **Extraction** ([`crate::extractor`]): each source is scanned for
//!    `partial` / `partialCached` invocations, producing a
//!    [`DependencyRecord`](crate::extractor::DependencyRecord).
//! 2. **Key index** ([`key_index`]): records are frozen in discovery order and
//!    every reference is resolved to the first key the configured
//!    [`KeyMatcher`](crate::pattern::KeyMatcher) accepts.
//! 3. **Closure** ([`closure`]): references are followed depth-first with a
//!    per-path cycle guard.
//! 4. **Shaping** ([`shaper`]): closure keys are split into `{type, entry}`
//!    descriptors.
//!
//! [`DependencyGraph`] drives the pipeline and adds the queries built on top
//! of it: reverse lookup ([`DependencyGraph::affected`]), health checks
//! ([`DependencyGraph::diagnose`]) and content fingerprints.
//!
//! # Ordering
//!
//! Every output is ordered by discovery order or closure preorder, never by
//! hash order or thread scheduling. Running the resolver twice on the same
//! input yields identical output.
//!
//! # Example
//!
//! ```rust
//! use pdeps_cli::core::PartialSource;
//! use pdeps_cli::pattern::ContainsMatcher;
//! use pdeps_cli::resolver::resolve_partials;
//! use std::sync::Arc;
//!
//! let sources = vec![
//!     PartialSource::new("cards", "list", r#"{{ range . }}{{ partial "cards/item.html" . }}{{ end }}"#),
//!     PartialSource::new("cards", "item", r#"<li>{{ partial "site/link" . }}</li>"#),
//!     PartialSource::new("site", "link", "<a></a>"),
//! ];
//!
//! let deps = resolve_partials(sources, Arc::new(ContainsMatcher));
//! let list: Vec<String> = deps["cards/list"].iter().map(|d| d.key()).collect();
//! assert_eq!(list, ["cards/item", "site/link"]);
//! assert!(deps["site/link"].is_empty());
//! ```

pub mod closure;
pub mod dependency_graph;
pub mod diagnostics;
pub mod fingerprint;
pub mod key_index;
pub mod shaper;

use std::sync::Arc;

pub use closure::ClosureResolver;
pub use dependency_graph::DependencyGraph;
pub use diagnostics::{AmbiguousReference, Diagnostics, UnresolvedReference};
pub use key_index::{KeyId, KeyIndex};

use crate::core::{PartialDependencies, PartialSource};
use crate::pattern::KeyMatcher;

/// Resolve the transitive dependencies of every partial.
///
/// Convenience wrapper around [`DependencyGraph::from_sources`] and
/// [`DependencyGraph::resolve_all`].
pub fn resolve_partials(
    sources: impl IntoIterator<Item = PartialSource>,
    matcher: Arc<dyn KeyMatcher>,
) -> PartialDependencies {
    DependencyGraph::from_sources(sources, matcher).resolve_all()
}
