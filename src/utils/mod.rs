//! Supporting utilities.
//!
//! - [`progress`] - progress bars drawn on stderr

pub mod progress;

pub use progress::ProgressBar;
