//! Helpers shared by the CLI commands.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use super::CliConfig;
use crate::config::Settings;
use crate::discovery::discover_partials;
use crate::resolver::DependencyGraph;
use crate::utils::progress::progress_enabled;

/// Output format for command results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// Human-readable text
    Text,
}

/// Settings and the dependency graph for the current project.
#[derive(Debug)]
pub struct ProjectContext {
    /// Effective settings
    pub settings: Settings,
    /// Graph built from every discovered partial
    pub graph: DependencyGraph,
}

/// Load settings, read all partials and build the dependency graph.
///
/// # Errors
///
/// Returns an error if the working directory is unavailable, the config file
/// is missing or invalid, or the partials directory does not exist.
pub async fn load_project(config: &CliConfig) -> Result<ProjectContext> {
    let cwd = std::env::current_dir().context("Failed to determine the current directory")?;

    let mut settings = Settings::load(config.config_path.as_deref(), &cwd)?;
    if let Some(dir) = &config.partials_dir {
        settings = settings.with_partials_dir(dir, &cwd);
    }
    debug!(
        "Using partials directory {} (match mode: {})",
        settings.partials_dir.display(),
        settings.match_mode
    );

    let options = settings.discovery_options(progress_enabled(!config.no_progress));
    let sources = discover_partials(&settings.partials_dir, &options).await?;

    let graph = DependencyGraph::from_sources(sources, settings.matcher());
    info!("Loaded {} partial(s) from {}", graph.len(), settings.partials_dir.display());

    Ok(ProjectContext {
        settings,
        graph,
    })
}

/// Serialize `value` as pretty-printed JSON with a trailing newline.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    json.push('\n');
    Ok(json)
}
