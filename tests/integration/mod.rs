//! Integration test suite for pdeps
//!
//! End-to-end tests that run the `pdeps` binary against temporary template
//! projects.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **affected**: rebuild scope for changed partials
//! - **config**: `pdeps.toml` discovery, overrides and errors
//! - **resolve**: transitive dependency output
//! - **tree**: dependency tree drawing
//! - **validate**: reference diagnostics and strict mode

#[path = "../common/mod.rs"]
mod common;

mod affected;
mod config;
mod resolve;
mod tree;
mod validate;
