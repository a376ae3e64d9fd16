//! Core types for pdeps
//!
//! This module holds the fundamental types shared by every layer of the crate:
//!
//! - [`PdepsError`] - Enumerated error types for the crate boundary
//! - [`ErrorContext`] - User-friendly error wrapper with suggestions
//! - [`user_friendly_error`] - Convert any error into a displayable context
//! - [`PartialKey`], [`PartialSource`], [`ResolvedDependency`] - The data model
//!   of the resolver (see [`partial`])
//!
//! # Error Handling Pattern
//!
//! ```rust,no_run
//! use pdeps_cli::core::{PdepsError, user_friendly_error};
//! use anyhow::Result;
//!
//! fn example_operation() -> Result<String> {
//!     Err(PdepsError::PartialsDirNotFound {
//!         path: "layouts/partials".to_string(),
//!     }
//!     .into())
//! }
//!
//! if let Err(e) = example_operation() {
//!     user_friendly_error(e).display();
//! }
//! ```

pub mod error;
pub mod partial;

pub use error::{ErrorContext, PdepsError, user_friendly_error};
pub use partial::{
    KEY_SEPARATOR, PartialDependencies, PartialKey, PartialSource, ResolvedDependency,
};
