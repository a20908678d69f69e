//! Chess clock core
//!
//! Pure timing logic: the two-sided countdown state machine, its
//! configuration errors, and the monotonic time sources that feed it.

pub mod clock_state;
pub mod error;
pub mod source;

pub use clock_state::{
    ClockEvent, ClockState, PerSide, Side, DEFAULT_BASE_SECONDS, DEFAULT_INCREMENT_SECONDS,
};
pub use error::ClockError;
pub use source::{MockClock, MonotonicClock, SystemClock};
