//! List the rebuild scope for changed partials.
//!
//! Given the keys of partials that changed, prints every partial whose
//! transitive dependencies include one of them, plus the changed partials
//! themselves, in discovery order.
//!
//! ```bash
//! $ pdeps affected cards/item --format text
//! cards/list
//! cards/item
//! site/page
//! ```

use anyhow::Result;
use clap::Args;
use tracing::warn;

use super::CliConfig;
use super::common::{OutputFormat, load_project, to_json};
use crate::core::PartialKey;
use crate::resolver::DependencyGraph;

/// Arguments of `pdeps affected`.
#[derive(Args, Debug, Default)]
pub struct AffectedCommand {
    /// Keys (`type/entry`) of the changed partials
    #[arg(required = true, value_name = "KEY")]
    pub keys: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

impl AffectedCommand {
    /// Run the command.
    ///
    /// # Errors
    ///
    /// Returns an error if the project cannot be loaded.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let project = load_project(config).await?;
        print!("{}", self.render(&project.graph)?);
        Ok(())
    }

    /// Render the affected partials for `graph`.
    ///
    /// Unknown keys are reported as warnings and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render(&self, graph: &DependencyGraph) -> Result<String> {
        for key in &self.keys {
            if let Err(e) = graph.id_of(key) {
                warn!("{e}, ignoring it");
            }
        }

        let affected: Vec<&str> =
            graph.affected(&self.keys).into_iter().map(PartialKey::as_str).collect();

        match self.format {
            OutputFormat::Json => to_json(&affected),
            OutputFormat::Text => Ok(affected.iter().map(|key| format!("{key}\n")).collect()),
        }
    }
}
