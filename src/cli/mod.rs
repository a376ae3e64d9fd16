//! Command-line interface for pdeps.
//!
//! Every command follows the same flow: load settings, discover and read the
//! partials, build a [`DependencyGraph`](crate::resolver::DependencyGraph),
//! then render a query over it to stdout. Logs and progress go to stderr, so
//! stdout can be piped into other tools.
//!
//! # Commands
//!
//! - `resolve` - transitive dependencies of every (or one) partial
//! - `tree` - direct dependencies drawn as a tree, or dependents with `--invert`
//! - `affected` - partials to rebuild when the given partials change
//! - `validate` - unresolved references, ambiguous references and cycles
//!
//! # Global Options
//!
//! - `-v, --verbose` - debug logging
//! - `-q, --quiet` - errors only
//! - `-c, --config <FILE>` - config file (also `PDEPS_CONFIG`)
//! - `--partials-dir <DIR>` - partials directory, overriding the config
//! - `--no-progress` - never draw progress bars
//!
//! # Examples
//!
//! ```bash
//! # Everything, as JSON
//! pdeps resolve
//!
//! # One partial, human-readable, with fingerprints
//! pdeps resolve --partial cards/list --format text --fingerprints
//!
//! # What to rebuild after editing two partials
//! pdeps affected cards/item site/nav
//!
//! # Fail CI on typos in partial names
//! pdeps validate --strict
//! ```

mod affected;
pub mod common;
mod resolve;
mod tree;
pub mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::constants::CONFIG_ENV_VAR;

/// Runtime options shared by all commands, derived from the global flags.
///
/// Commands receive this explicitly instead of reading process-wide state,
/// which keeps them callable from tests with any combination of options.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter directive (`debug`, `info`, `error`)
    pub log_level: Option<String>,

    /// Disable progress indicators
    pub no_progress: bool,

    /// Explicit config file
    pub config_path: Option<PathBuf>,

    /// Partials directory overriding the config
    pub partials_dir: Option<PathBuf>,
}

impl CliConfig {
    /// Default configuration: error-level logging, progress enabled, config
    /// searched.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The level used when `RUST_LOG` is unset.
    #[must_use]
    pub fn effective_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("error")
    }

    /// Install the stderr log subscriber.
    ///
    /// `RUST_LOG` takes precedence over the level chosen by the flags. Calling
    /// this more than once keeps the first subscriber.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.effective_log_level()));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Resolve transitive dependencies between template partials.
#[derive(Parser)]
#[command(
    name = "pdeps",
    about = "Resolve transitive dependencies between template partials",
    version,
    long_about = "pdeps reads the partials of a template project, follows every partial \
                  and partialCached invocation, and reports which partials each one depends \
                  on. Use it to decide what to rebuild when a partial changes."
)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to pdeps.toml (searched in parent directories by default)
    #[arg(short, long, global = true, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Partials directory, overriding the configuration
    #[arg(long, global = true, value_name = "DIR")]
    partials_dir: Option<PathBuf>,

    /// Disable progress bars
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the transitive dependencies of every partial
    Resolve(resolve::ResolveCommand),

    /// Draw the dependency tree of partials
    Tree(tree::TreeCommand),

    /// List the partials affected by changes to the given partials
    Affected(affected::AffectedCommand),

    /// Report unresolved references, ambiguous references and cycles
    Validate(validate::ValidateCommand),
}

impl Cli {
    /// Execute the parsed command with logging set up from the global flags.
    ///
    /// # Errors
    ///
    /// Returns any error from configuration loading, discovery, or the command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    /// Derive the [`CliConfig`] from the global flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        CliConfig {
            log_level: Some(log_level.to_string()),
            no_progress: self.no_progress,
            config_path: self.config.clone(),
            partials_dir: self.partials_dir.clone(),
        }
    }

    /// Execute the command with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns any error from configuration loading, discovery, or the command.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Resolve(cmd) => cmd.execute(&config).await,
            Commands::Tree(cmd) => cmd.execute(&config).await,
            Commands::Affected(cmd) => cmd.execute(&config).await,
            Commands::Validate(cmd) => cmd.execute(&config).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_build_config_levels() {
        let cli = Cli::parse_from(["pdeps", "resolve"]);
        let config = cli.build_config();
        assert_eq!(config.log_level.as_deref(), Some("info"));
        assert!(!config.no_progress);

        let cli = Cli::parse_from(["pdeps", "-v", "tree"]);
        assert_eq!(cli.build_config().log_level.as_deref(), Some("debug"));

        let cli = Cli::parse_from(["pdeps", "validate", "--quiet", "--no-progress"]);
        let config = cli.build_config();
        assert_eq!(config.log_level.as_deref(), Some("error"));
        assert!(config.no_progress);
    }

    #[test]
    fn test_default_config_logs_errors_only() {
        let config = CliConfig::new();
        assert_eq!(config.log_level, None);
        assert_eq!(config.effective_log_level(), "error");
        assert!(!config.no_progress);
        assert!(config.config_path.is_none());

        let cli = Cli::parse_from(["pdeps", "resolve"]);
        assert_eq!(cli.build_config().effective_log_level(), "info");
    }

    #[test]
    fn test_global_paths() {
        let cli = Cli::parse_from([
            "pdeps",
            "--partials-dir",
            "theme/partials",
            "affected",
            "cards/item",
            "--config",
            "site.toml",
        ]);
        let config = cli.build_config();
        assert_eq!(config.partials_dir, Some(PathBuf::from("theme/partials")));
        assert_eq!(config.config_path, Some(PathBuf::from("site.toml")));
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["pdeps", "-v", "-q", "resolve"]).is_err());
    }
}
