//! Error handling for pdeps
//!
//! This module provides the error types and user-friendly error reporting for
//! the partial dependency resolver. The error system follows two principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`PdepsError`] - Enumerated error types for failures at the crate boundary
//! - [`ErrorContext`] - Wrapper that adds user-friendly details and suggestions
//!
//! The resolution core itself never fails: unreadable partials are skipped,
//! unresolved references contribute nothing, and malformed directives are not
//! extracted. Errors only arise at the edges, such as loading configuration,
//! locating the partials directory, or looking up a partial named on the
//! command line.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pdeps_cli::core::{PdepsError, ErrorContext, user_friendly_error};
//!
//! let error = PdepsError::PartialsDirNotFound {
//!     path: "layouts/partials".to_string(),
//! };
//!
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for pdeps operations
///
/// # Error Categories
///
/// ## Configuration
/// - [`ConfigNotFound`] - An explicitly requested config file does not exist
/// - [`ConfigParseError`] - The config file is not valid TOML or has unknown keys
/// - [`InvalidConfig`] - The config parses but contains an invalid value
///
/// ## Partials
/// - [`PartialsDirNotFound`] - The partials directory does not exist
/// - [`InvalidPartialKey`] - A type segment contains the key separator
/// - [`PartialNotFound`] - A partial named by the user is not in the graph
/// - [`InvalidPattern`] - A glob in the configuration cannot be compiled
///
/// ## Validation
/// - [`ValidationFailed`] - `validate --strict` found unresolved references
///
/// [`ConfigNotFound`]: PdepsError::ConfigNotFound
/// [`ConfigParseError`]: PdepsError::ConfigParseError
/// [`InvalidConfig`]: PdepsError::InvalidConfig
/// [`PartialsDirNotFound`]: PdepsError::PartialsDirNotFound
/// [`InvalidPartialKey`]: PdepsError::InvalidPartialKey
/// [`PartialNotFound`]: PdepsError::PartialNotFound
/// [`InvalidPattern`]: PdepsError::InvalidPattern
/// [`ValidationFailed`]: PdepsError::ValidationFailed
#[derive(Error, Debug)]
pub enum PdepsError {
    /// Config file given explicitly does not exist
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was looked up
        path: String,
    },

    /// Config file could not be parsed
    #[error("Invalid configuration file syntax in {file}")]
    ConfigParseError {
        /// Config file path
        file: String,
        /// Parser message
        reason: String,
    },

    /// Config file contains an invalid value
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong
        message: String,
    },

    /// The partials directory does not exist or is not a directory
    #[error("Partials directory not found: {path}")]
    PartialsDirNotFound {
        /// Directory that was searched
        path: String,
    },

    /// A partial key whose type segment contains the separator
    #[error("Invalid partial key '{key}': {reason}")]
    InvalidPartialKey {
        /// The offending key
        key: String,
        /// Why it was rejected
        reason: String,
    },

    /// A partial requested by the user does not exist
    #[error("Partial '{key}' not found")]
    PartialNotFound {
        /// The requested key
        key: String,
        /// Closest known keys
        suggestions: Vec<String>,
    },

    /// A glob pattern could not be compiled
    #[error("Invalid glob pattern: {pattern}")]
    InvalidPattern {
        /// The pattern text
        pattern: String,
        /// Compiler message
        reason: String,
    },

    /// Strict validation found problems
    #[error("Validation failed: {count} unresolved partial reference(s)")]
    ValidationFailed {
        /// Number of unresolved references
        count: usize,
    },

    /// IO error from the standard library
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML deserialization error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Any other error
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl Clone for PdepsError {
    fn clone(&self) -> Self {
        match self {
            Self::ConfigNotFound {
                path,
            } => Self::ConfigNotFound {
                path: path.clone(),
            },
            Self::ConfigParseError {
                file,
                reason,
            } => Self::ConfigParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::InvalidConfig {
                message,
            } => Self::InvalidConfig {
                message: message.clone(),
            },
            Self::PartialsDirNotFound {
                path,
            } => Self::PartialsDirNotFound {
                path: path.clone(),
            },
            Self::InvalidPartialKey {
                key,
                reason,
            } => Self::InvalidPartialKey {
                key: key.clone(),
                reason: reason.clone(),
            },
            Self::PartialNotFound {
                key,
                suggestions,
            } => Self::PartialNotFound {
                key: key.clone(),
                suggestions: suggestions.clone(),
            },
            Self::InvalidPattern {
                pattern,
                reason,
            } => Self::InvalidPattern {
                pattern: pattern.clone(),
                reason: reason.clone(),
            },
            Self::ValidationFailed {
                count,
            } => Self::ValidationFailed {
                count: *count,
            },
            // For errors that don't implement Clone, convert to Other
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// When displayed, errors show:
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context in yellow (optional)
/// 3. **Suggestion**: Actionable steps in green (optional)
///
/// # Examples
///
/// ```rust,no_run
/// use pdeps_cli::core::{PdepsError, ErrorContext};
///
/// let context = ErrorContext::new(PdepsError::ConfigNotFound {
///     path: "pdeps.toml".to_string(),
/// })
/// .with_suggestion("Create a pdeps.toml file or drop the --config flag")
/// .with_details("pdeps only fails on a missing config file when one is requested explicitly");
///
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: PdepsError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: PdepsError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`PdepsError`] variants (also when wrapped in `anyhow` context),
/// [`std::io::Error`] and [`toml::de::Error`]; anything else is reported with
/// its full cause chain.
///
/// # Examples
///
/// ```rust,no_run
/// use pdeps_cli::core::user_friendly_error;
///
/// let error = anyhow::anyhow!("Something went wrong");
/// let context = user_friendly_error(error);
///
/// context.display();
/// ```
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(pdeps_error) = cause.downcast_ref::<PdepsError>() {
            return create_error_context(pdeps_error.clone());
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(PdepsError::Other {
                    message: format!("Permission denied: {io_error}"),
                })
                .with_suggestion("Check the permissions of the partials directory and its files");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(PdepsError::Other {
                    message: format!("File not found: {io_error}"),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(PdepsError::ConfigParseError {
            file: "pdeps.toml".to_string(),
            reason: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax in your pdeps.toml file")
        .with_details(toml_error.to_string());
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();

    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(PdepsError::Other {
        message,
    })
}

/// Map each [`PdepsError`] variant to an [`ErrorContext`] with tailored suggestions.
fn create_error_context(error: PdepsError) -> ErrorContext {
    match &error {
        PdepsError::ConfigNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the --config path or the PDEPS_CONFIG environment variable")
            .with_details("Without --config, pdeps searches the current and parent directories for pdeps.toml and falls back to defaults"),

        PdepsError::ConfigParseError {
            reason,
            ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Valid keys are partials_dir, extension, match_mode, exclude and max_parallel")
                .with_details(details)
        }

        PdepsError::InvalidConfig {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("match_mode must be \"contains\" or \"glob\" and max_parallel must be at least 1"),

        PdepsError::PartialsDirNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Pass --partials-dir or set partials_dir in pdeps.toml")
            .with_details("The default partials directory is layouts/partials relative to the project root"),

        PdepsError::InvalidPartialKey {
            ..
        } => ErrorContext::new(error)
            .with_details("Partial keys have the form <type>/<entry> where the type is the name of the containing directory"),

        PdepsError::PartialNotFound {
            suggestions,
            ..
        } => {
            let ctx = ErrorContext::new(error.clone())
                .with_details("Partial keys have the form <type>/<entry>, e.g. components/card");
            if suggestions.is_empty() {
                ctx.with_suggestion("Run 'pdeps resolve --format text' to list all partials")
            } else {
                ctx.with_suggestion(format!("Did you mean: {}?", suggestions.join(", ")))
            }
        }

        PdepsError::InvalidPattern {
            reason,
            ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Check the exclude patterns in pdeps.toml")
                .with_details(details)
        }

        PdepsError::ValidationFailed {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Fix the references listed above or run without --strict"),

        _ => ErrorContext::new(error),
    }
}
