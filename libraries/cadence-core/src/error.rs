//! Core error types for Cadence

use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for Cadence
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Unknown repeat mode string
    #[error("Invalid repeat mode: {0} (expected off, one or all)")]
    InvalidRepeatMode(String),
}
