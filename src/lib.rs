//! pdeps - template partial dependency resolver
//!
//! Reads the partials of a template project, finds every `partial` and
//! `partialCached` invocation in them, and computes for each partial the full
//! set of partials it transitively depends on. Build tools use the result to
//! decide what to re-render when a partial changes.
//!
//! # Pipeline
//!
//! 1. [`discovery`] walks the partials directory and reads every template
//!    into a [`PartialSource`](core::PartialSource).
//! 2. [`extractor`] pulls the referenced partial names out of each template.
//! 3. [`resolver::KeyIndex`] maps each reference onto a known partial key,
//!    using the [`KeyMatcher`](pattern::KeyMatcher) chosen by the config.
//! 4. [`resolver::ClosureResolver`] follows references transitively,
//!    tolerating cycles.
//! 5. [`resolver::shaper`] turns keys into `{ type, entry }` records.
//!
//! [`resolver::DependencyGraph`] wraps steps 2 to 5 and adds reverse lookups,
//! diagnostics and fingerprints on top.
//!
//! # Modules
//!
//! - [`cli`] - `pdeps` subcommands
//! - [`config`] - `pdeps.toml` loading and effective settings
//! - [`constants`] - defaults shared across modules
//! - [`core`] - error type and the partial data model
//! - [`discovery`] - finding and reading partial files
//! - [`extractor`] - reference extraction from template text
//! - [`pattern`] - key matching strategies and glob helpers
//! - [`resolver`] - indexing, closure computation and the graph facade
//! - [`utils`] - progress reporting
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
//!     PartialSource::new("site", "page", r#"{{ partial "site/header" . }}"#),
//!     PartialSource::new("site", "header", ""),
//! ];
//! let deps = resolve_partials(sources, Arc::new(ContainsMatcher));
//! assert_eq!(deps["site/page"][0].entry, "header");
//! assert!(deps["site/header"].is_empty());
//! ```
//!
//! # Configuration (pdeps.toml)
//!
//! ```toml
//! partials_dir = "layouts/partials"
//! extension = "html"
//! match_mode = "contains"   # or "glob"
//! exclude = ["**/_drafts/**"]
//! max_parallel = 8
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod discovery;
pub mod extractor;
pub mod pattern;
pub mod resolver;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
