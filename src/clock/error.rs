//! Clock configuration errors

use std::fmt;

/// Rejected game configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockError {
    /// Base time must be a finite number of seconds above zero.
    InvalidBase(f64),
    /// Increment must be a finite, non-negative number of seconds.
    InvalidIncrement(f64),
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockError::InvalidBase(value) => {
                write!(f, "base time must be positive, got {} seconds", value)
            }
            ClockError::InvalidIncrement(value) => {
                write!(f, "increment must not be negative, got {} seconds", value)
            }
        }
    }
}

impl std::error::Error for ClockError {}
