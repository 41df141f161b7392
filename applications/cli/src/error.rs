/// CLI error types
use cadence_catalog_client::CatalogError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog request failed: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Song not found: {0}")]
    SongNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for CliError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
