//! Utility functions module
//!
//! Display formatting and process signal handling.

pub mod format_time;
pub mod signals;

// Re-export main functions
pub use format_time::format_time;
pub use signals::shutdown_signal;
