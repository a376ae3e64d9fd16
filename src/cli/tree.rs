//! Display partial dependency trees.
//!
//! Draws the direct references of each partial as a tree, similar to
//! `cargo tree`. With `--invert` the tree shows who references a partial
//! instead, which answers "where is this partial used?".
//!
//! # Output Format
//!
//! ```text
//! site/page
//! ├── site/header
//! │   └── site/nav
//! ├── cards/list
//! │   └── cards/item
//! └── site/footer
//!     └── site/nav (*)
//!
//! (*) = subtree shown above
//! ```
//!
//! - `(*)` marks a partial whose subtree was already drawn (disable with
//!   `--no-dedupe`)
//! - `(cycle)` marks a reference back to a partial on the current branch

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::collections::HashSet;
use std::fmt::Write as _;

use super::CliConfig;
use super::common::load_project;
use crate::resolver::{DependencyGraph, KeyId};

/// Arguments of `pdeps tree`.
#[derive(Args, Debug, Default)]
pub struct TreeCommand {
    /// Only draw the tree of this partial (`type/entry`)
    #[arg(short, long, value_name = "KEY")]
    pub partial: Option<String>,

    /// Maximum depth to draw (0 draws only the roots)
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Draw repeated subtrees in full
    #[arg(long)]
    pub no_dedupe: bool,

    /// Show dependents instead of dependencies
    #[arg(short, long)]
    pub invert: bool,
}

struct TreeBuilder<'a> {
    graph: &'a DependencyGraph,
    cmd: &'a TreeCommand,
    out: String,
    expanded: HashSet<KeyId>,
    path: Vec<KeyId>,
    marked_duplicate: bool,
}

impl TreeCommand {
    /// Run the command.
    ///
    /// # Errors
    ///
    /// Returns an error if the project cannot be loaded or `--partial` names
    /// an unknown partial.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let project = load_project(config).await?;
        if project.graph.is_empty() {
            println!("No partials found in {}", project.settings.partials_dir.display());
            return Ok(());
        }
        print!("{}", self.render(&project.graph)?);
        Ok(())
    }

    /// Render the trees for `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`PdepsError::PartialNotFound`](crate::core::PdepsError::PartialNotFound)
    /// for an unknown `--partial`.
    pub fn render(&self, graph: &DependencyGraph) -> Result<String> {
        let roots: Vec<KeyId> = match &self.partial {
            Some(key) => vec![graph.id_of(key)?],
            None => (0..graph.len()).collect(),
        };

        let mut builder = TreeBuilder {
            graph,
            cmd: self,
            out: String::new(),
            expanded: HashSet::new(),
            path: Vec::new(),
            marked_duplicate: false,
        };

        for (i, root) in roots.iter().enumerate() {
            if i > 0 {
                builder.out.push('\n');
            }
            builder.root(*root);
        }

        if builder.marked_duplicate {
            let _ = writeln!(builder.out, "\n{}", "(*) = subtree shown above".dimmed());
        }
        Ok(builder.out)
    }
}

impl TreeBuilder<'_> {
    fn root(&mut self, id: KeyId) {
        let _ = writeln!(self.out, "{}", self.label(id).bold());
        self.expanded.clear();
        self.expanded.insert(id);
        self.path.push(id);
        self.children(id, "", 1);
        self.path.pop();
    }

    fn children(&mut self, id: KeyId, prefix: &str, depth: usize) {
        if self.cmd.depth.is_some_and(|max| depth > max) {
            return;
        }

        let children: Vec<KeyId> = if self.cmd.invert {
            self.graph.dependent_ids(id)
        } else {
            self.graph.direct_ids(id).to_vec()
        };

        for (i, child) in children.iter().copied().enumerate() {
            let is_last = i + 1 == children.len();
            let connector = if is_last {
                "└── "
            } else {
                "├── "
            };
            let label = self.label(child);

            if self.path.contains(&child) {
                let _ = writeln!(self.out, "{prefix}{connector}{label} {}", "(cycle)".yellow());
                continue;
            }

            let has_children = if self.cmd.invert {
                !self.graph.dependent_ids(child).is_empty()
            } else {
                !self.graph.direct_ids(child).is_empty()
            };

            if !self.cmd.no_dedupe && has_children && self.expanded.contains(&child) {
                let _ = writeln!(self.out, "{prefix}{connector}{label} {}", "(*)".dimmed());
                self.marked_duplicate = true;
                continue;
            }

            let _ = writeln!(self.out, "{prefix}{connector}{label}");
            self.expanded.insert(child);

            let child_prefix = if is_last {
                format!("{prefix}    ")
            } else {
                format!("{prefix}│   ")
            };
            self.path.push(child);
            self.children(child, &child_prefix, depth + 1);
            self.path.pop();
        }
    }

    fn label(&self, id: KeyId) -> String {
        self.graph.key(id).map(ToString::to_string).unwrap_or_default()
    }
}
