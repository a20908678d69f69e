//! State management module
//!
//! The shared application state wrapping the clock session, its display
//! snapshot, and the errors its operations report.

pub mod app_state;
pub mod clock_snapshot;
pub mod error;

// Re-export main types
pub use app_state::{AppState, Session, TickOutcome};
pub use clock_snapshot::ClockSnapshot;
pub use error::AppError;
