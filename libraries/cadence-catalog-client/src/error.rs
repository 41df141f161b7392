//! Error types for the catalog client.

use thiserror::Error;

/// Errors that can occur when talking to the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Transport failure or non-success HTTP status
    #[error("Network error: {message}")]
    Network {
        /// HTTP status, when the server answered at all
        status: Option<u16>,
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Invalid catalog base URL
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// Catalog answered but flagged the request as failed
    #[error("Catalog error: {0}")]
    Api(String),
}

impl CatalogError {
    /// Whether the failure happened on the wire rather than in the payload
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// HTTP status of a non-success response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
