//! Application-level errors

use std::fmt;

use crate::clock::ClockError;

/// Failure of an application operation, classified for the HTTP layer.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// The requested game configuration was rejected.
    InvalidConfig(String),
    /// A named preset or side does not exist.
    NotFound(String),
    /// Lock poisoning or storage failure.
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            AppError::NotFound(msg) => write!(f, "not found: {}", msg),
            AppError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ClockError> for AppError {
    fn from(e: ClockError) -> Self {
        AppError::InvalidConfig(e.to_string())
    }
}
