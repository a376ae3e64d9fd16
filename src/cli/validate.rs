//! Check partial references for problems.
//!
//! `pdeps validate` reports three kinds of findings:
//!
//! - **Unresolved references**: a `partial "..."` argument that matches no
//!   partial. Usually a typo or a deleted file; suggestions are shown when a
//!   similar key exists.
//! - **Ambiguous references**: an argument that matches several partials. The
//!   earliest-discovered one is used, which is rarely what a short name was
//!   meant to select.
//! - **Cycles**: partials that reference each other, directly or indirectly.
//!   Resolution handles them, but rendering such templates recurses forever.
//!
//! Findings never stop resolution. The command exits with an error only
//! when `--strict` is given and unresolved references exist.
//!
//! # Examples
//!
//! ```bash
//! pdeps validate
//! pdeps validate --strict --format json
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fmt::Write as _;

use super::CliConfig;
use super::common::{OutputFormat, load_project, to_json};
use crate::core::PdepsError;
use crate::resolver::Diagnostics;

/// Arguments of `pdeps validate`.
#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Fail when references cannot be resolved
    #[arg(long)]
    pub strict: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ValidateCommand {
    /// Run the command.
    ///
    /// # Errors
    ///
    /// Returns an error if the project cannot be loaded, or
    /// [`PdepsError::ValidationFailed`] in strict mode when references are
    /// unresolved.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let project = load_project(config).await?;
        let diagnostics = project.graph.diagnose();

        print!("{}", self.render(&diagnostics)?);
        self.check(&diagnostics)
    }

    /// Render the report.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render(&self, diagnostics: &Diagnostics) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(diagnostics),
            OutputFormat::Text => Ok(render_text(diagnostics)),
        }
    }

    /// Apply the exit policy.
    ///
    /// # Errors
    ///
    /// Returns [`PdepsError::ValidationFailed`] in strict mode when references
    /// are unresolved.
    pub fn check(&self, diagnostics: &Diagnostics) -> Result<()> {
        if self.strict && !diagnostics.unresolved.is_empty() {
            return Err(PdepsError::ValidationFailed {
                count: diagnostics.unresolved.len(),
            }
            .into());
        }
        Ok(())
    }
}

fn render_text(diagnostics: &Diagnostics) -> String {
    let mut out = String::new();

    if diagnostics.is_clean() {
        let _ = writeln!(
            out,
            "{} {} partial(s) checked, no problems found",
            "✓".green(),
            diagnostics.partials
        );
        return out;
    }

    if !diagnostics.unresolved.is_empty() {
        let _ = writeln!(out, "{} Unresolved references:", "✗".red());
        for item in &diagnostics.unresolved {
            let _ = write!(out, "  {}: \"{}\"", item.owner, item.reference);
            if !item.suggestions.is_empty() {
                let _ = write!(out, " (did you mean: {}?)", item.suggestions.join(", "));
            }
            out.push('\n');
        }
    }

    if !diagnostics.ambiguous.is_empty() {
        let _ = writeln!(out, "{} Ambiguous references:", "⚠".yellow());
        for item in &diagnostics.ambiguous {
            let _ = writeln!(
                out,
                "  {}: \"{}\" resolves to {} (also matches: {})",
                item.owner,
                item.reference,
                item.chosen,
                item.others.join(", ")
            );
        }
    }

    if !diagnostics.cycles.is_empty() {
        let _ = writeln!(out, "{} Reference cycles:", "⚠".yellow());
        for cycle in &diagnostics.cycles {
            let _ = writeln!(out, "  {}", cycle.join(" <-> "));
        }
    }

    let _ = writeln!(
        out,
        "\n{} partial(s) checked, {} problem(s) found",
        diagnostics.partials,
        diagnostics.issue_count()
    );
    out
}
