//! Progress indicators for long-running discovery work.
//!
//! Wraps `indicatif` with pdeps styling. Indicators draw to stderr so they
//! never mix with command output on stdout.
//!
//! # When Progress Is Hidden
//!
//! - `--no-progress` was passed on the command line
//! - `PDEPS_NO_PROGRESS` is set to any value
//! - stderr is not a terminal (pipes, redirects, CI logs)
//!
//! A hidden indicator accepts every call and draws nothing, so callers never
//! branch on whether progress is shown.
//!
//! # Examples
//!
//! ```rust
//! use pdeps_cli::utils::progress::ProgressBar;
//!
//! let progress = ProgressBar::new(3, false);
//! progress.set_message("Reading partials");
//! for _ in 0..3 {
//!     progress.inc(1);
//! }
//! progress.finish_and_clear();
//! ```

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::io::IsTerminal;

use crate::constants::NO_PROGRESS_ENV_VAR;

/// Whether progress indicators should be drawn.
///
/// `requested` is the caller's own preference (false for `--no-progress`).
pub fn progress_enabled(requested: bool) -> bool {
    requested && std::env::var_os(NO_PROGRESS_ENV_VAR).is_none() && std::io::stderr().is_terminal()
}

/// A progress bar with consistent styling.
#[derive(Clone)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Creates a bar tracking `len` units of work. Hidden unless `enabled`.
    pub fn new(len: u64, enabled: bool) -> Self {
        let bar = if enabled {
            let bar = IndicatifBar::new(len);
            bar.set_style(default_style());
            bar
        } else {
            IndicatifBar::hidden()
        };
        Self {
            inner: bar,
        }
    }

    /// Sets the message shown next to the indicator.
    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    /// Advances by `delta` units.
    pub fn inc(&self, delta: u64) {
        self.inner.inc(delta);
    }

    /// Current position.
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    /// Whether nothing is drawn.
    pub fn is_hidden(&self) -> bool {
        self.inner.is_hidden()
    }

    /// Finishes and removes the indicator from the terminal.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

fn default_style() -> IndicatifStyle {
    IndicatifStyle::default_bar()
        .template("{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| IndicatifStyle::default_bar())
        .progress_chars("━╸━")
}
