//! Partial reference extraction from template source.
//!
//! This module scans a partial's template text for invocations of other
//! partials and turns each invocation into a wildcard-wrapped reference that
//! the key index can match against known partial keys.
//!
//! # Supported Invocations
//!
//! - `{{ partial "cards/item.html" . }}`
//! - `{{ partialCached "footer" . "variant" }}`
//! - `{{- $x := (partial "helpers/title" .) -}}`
//!
//! - `{{ partial "layout/card" (dict "body" (partial "helpers/icon" .)) }}`
//!
//! The directive name is matched case-insensitively, the action may span
//! several lines, and any number of invocations may appear on one line or
//! nested inside one action.
//!
//! # Extraction Rules
//!
//! - Only text inside an action counts. An action runs from `{{` to the next
//!   `}}`, or to the end of the text when it is never closed.
//! - The directive must be preceded by whitespace or `(`, so `mypartial` or
//!   `{{partial` are not invocations.
//! - The argument must be a non-empty, double-quoted string on one line. An
//!   unterminated quote simply does not match.
//! - Each argument `id` becomes the reference `*id*`, so exact names and
//!   patterns go through the same matching code downstream.
//!
//! # Usage
//!
//! ```rust,no_run
//! use pdeps_cli::extractor::extract_references;
//!
//! let source = r#"
//! <article>{{ partial "cards/item.html" . }}</article>
//! {{ partialCached "footer" . }}
//! "#;
//!
//! let references = extract_references(source);
//! assert_eq!(references, vec!["*cards/item.html*", "*footer*"]);
//! ```

use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

use crate::core::{PartialKey, PartialSource, PdepsError};

/// Wildcard marker wrapped around every extracted reference.
pub const WILDCARD: char = '*';

static ACTION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)\{\{(.*?)(?:\}\}|\z)").ok());

static PARTIAL_INVOCATION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?i)[\s(]partial(?:cached)?\s+"([^"\n]+)""#).ok());

/// The direct references of one partial.
///
/// This is the extractor's only output and is never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRecord {
    /// The partial the references were found in
    pub key: PartialKey,
    /// Wildcard-wrapped references in source order (duplicates kept)
    pub references: Vec<String>,
}

/// Extract the dependency record of a partial.
///
/// # Errors
///
/// Returns [`PdepsError::InvalidPartialKey`] if the source's segments do not
/// form a valid key; the text itself can never cause an error.
pub fn extract(source: &PartialSource) -> Result<DependencyRecord, PdepsError> {
    let key = source.key()?;
    let references = extract_references(&source.content);
    trace!("Extracted {} reference(s) from {}", references.len(), key);
    Ok(DependencyRecord {
        key,
        references,
    })
}

/// Extract all partial references from template source, in source order.
///
/// Returns an empty vector when the text contains no invocation.
#[must_use]
pub fn extract_references(content: &str) -> Vec<String> {
    let (Some(action), Some(invocation)) = (ACTION.as_ref(), PARTIAL_INVOCATION.as_ref()) else {
        return Vec::new();
    };

    action
        .captures_iter(content)
        .filter_map(|cap| cap.get(1))
        .flat_map(|body| invocation.captures_iter(body.as_str()))
        .filter_map(|cap| cap.get(1))
        .map(|m| wrap_reference(m.as_str()))
        .collect()
}

/// Wrap an identifier in wildcard markers: `foo/bar` becomes `*foo/bar*`.
#[must_use]
pub fn wrap_reference(identifier: &str) -> String {
    format!("{WILDCARD}{identifier}{WILDCARD}")
}

/// Strip one wildcard marker from each end, recovering the written identifier.
#[must_use]
pub fn unwrap_reference(reference: &str) -> &str {
    let trimmed = reference.strip_prefix(WILDCARD).unwrap_or(reference);
    trimmed.strip_suffix(WILDCARD).unwrap_or(trimmed)
}
