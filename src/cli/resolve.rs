//! Print the transitive dependencies of partials.
//!
//! # Output
//!
//! JSON (default) maps every partial key to its dependencies, in discovery
//! order:
//!
//! ```json
//! {
//!   "cards/list": [
//!     { "type": "cards", "entry": "item" }
//!   ],
//!   "cards/item": []
//! }
//! ```
//!
//! With `--fingerprints` each value becomes an object holding the
//! `fingerprint` and the `dependencies` array.
//!
//! Text output lists each partial followed by its indented dependencies:
//!
//! ```text
//! cards/list
//!   cards/item
//! cards/item
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt::Write as _;

use super::CliConfig;
use super::common::{OutputFormat, load_project, to_json};
use crate::core::{PartialDependencies, ResolvedDependency};
use crate::resolver::DependencyGraph;

/// Arguments of `pdeps resolve`.
#[derive(Args, Debug, Default)]
pub struct ResolveCommand {
    /// Only resolve this partial (`type/entry`)
    #[arg(short, long, value_name = "KEY")]
    pub partial: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Include a content fingerprint per partial
    #[arg(long)]
    pub fingerprints: bool,
}

#[derive(Serialize)]
struct FingerprintedEntry<'a> {
    fingerprint: &'a str,
    dependencies: &'a [ResolvedDependency],
}

impl ResolveCommand {
    /// Run the command.
    ///
    /// # Errors
    ///
    /// Returns an error if the project cannot be loaded or `--partial` names
    /// an unknown partial.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let project = load_project(config).await?;
        print!("{}", self.render(&project.graph)?);
        Ok(())
    }

    /// Render the command output for `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`PdepsError::PartialNotFound`](crate::core::PdepsError::PartialNotFound)
    /// for an unknown `--partial`.
    pub fn render(&self, graph: &DependencyGraph) -> Result<String> {
        let dependencies: PartialDependencies = match &self.partial {
            Some(key) => {
                let mut single = IndexMap::new();
                single.insert(key.clone(), graph.resolve(key)?);
                single
            }
            None => graph.resolve_all(),
        };

        let fingerprints: Option<IndexMap<String, String>> = if self.fingerprints {
            Some(match &self.partial {
                Some(key) => std::iter::once((key.clone(), graph.fingerprint(key)?)).collect(),
                None => graph.fingerprints(),
            })
        } else {
            None
        };

        match self.format {
            OutputFormat::Json => match &fingerprints {
                None => to_json(&dependencies),
                Some(prints) => {
                    let entries: IndexMap<&str, FingerprintedEntry<'_>> = dependencies
                        .iter()
                        .map(|(key, deps)| {
                            let fingerprint = prints.get(key).map_or("", String::as_str);
                            (
                                key.as_str(),
                                FingerprintedEntry {
                                    fingerprint,
                                    dependencies: deps,
                                },
                            )
                        })
                        .collect();
                    to_json(&entries)
                }
            },
            OutputFormat::Text => Ok(render_text(&dependencies, fingerprints.as_ref())),
        }
    }
}

fn render_text(
    dependencies: &PartialDependencies,
    fingerprints: Option<&IndexMap<String, String>>,
) -> String {
    let mut out = String::new();
    for (key, deps) in dependencies {
        match fingerprints.and_then(|prints| prints.get(key)) {
            Some(fp) => {
                let _ = writeln!(out, "{} {}", key.bold(), fp.dimmed());
            }
            None => {
                let _ = writeln!(out, "{}", key.bold());
            }
        }
        for dep in deps {
            let _ = writeln!(out, "  {dep}");
        }
    }
    out
}
