//! Global constants used throughout the pdeps codebase.
//!
//! File names, defaults, environment variable names and tuning values shared
//! by configuration, discovery and the CLI.

/// Name of the project configuration file searched for in the current
/// directory and its parents.
pub const CONFIG_FILE_NAME: &str = "pdeps.toml";

/// Partials directory used when the configuration does not name one,
/// relative to the configuration file's directory.
pub const DEFAULT_PARTIALS_DIR: &str = "layouts/partials";

/// Template file extension selected during discovery (without the dot).
pub const DEFAULT_EXTENSION: &str = "html";

/// Environment variable pointing at a configuration file.
pub const CONFIG_ENV_VAR: &str = "PDEPS_CONFIG";

/// Environment variable that disables progress output when set.
pub const NO_PROGRESS_ENV_VAR: &str = "PDEPS_NO_PROGRESS";

/// Default CPU core count when detection fails.
///
/// Used as a fallback when `std::thread::available_parallelism()` returns an error.
pub const FALLBACK_CORE_COUNT: usize = 4;

/// Maximum edit distance for "did you mean" suggestions, as a percentage of
/// the length of the misspelled name.
pub const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Maximum number of "did you mean" suggestions.
pub const MAX_SUGGESTIONS: usize = 3;

/// Default number of concurrent file reads during discovery.
pub fn default_max_parallel() -> usize {
    std::thread::available_parallelism().map_or(FALLBACK_CORE_COUNT, std::num::NonZero::get)
}
