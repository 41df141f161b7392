//! Error types for playback management

use thiserror::Error;

/// Playback errors raised at the driver's reaction boundary
///
/// These never propagate into the store: the driver logs them and keeps the
/// most recent one for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Play request interrupted by a subsequent load or pause (benign race)
    #[error("Playback interrupted: {0}")]
    Interrupted(String),

    /// Play request rejected for any other reason
    #[error("Playback error: {0}")]
    Rejected(String),

    /// Current song has no playable stream variant
    #[error("No stream available for song {0}")]
    NoStream(String),
}

impl PlaybackError {
    /// Whether this error is the benign interruption race
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::Interrupted(_))
    }
}

/// Errors from the persistence adapter
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored blob could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key is not usable as a storage name
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Result type for persistence operations
pub type Result<T> = std::result::Result<T, PersistenceError>;
