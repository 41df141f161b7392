/// CLI configuration
use crate::error::{CliError, Result};
use cadence_catalog_client::{CatalogConfig, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_catalog")]
    pub catalog: CatalogSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageSettings {
    /// Directory holding the persisted player state
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `cadence.toml` in the working
    /// directory is used when present. Environment variables prefixed with
    /// `CADENCE_` override both, with `__` between nested keys
    /// (`CADENCE_CATALOG__BASE_URL`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(settings.build()?.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = self.catalog.base_url.trim();
        if url.is_empty() {
            return Err(CliError::Config(
                "Catalog URL is required (set CADENCE_CATALOG__BASE_URL)".to_string(),
            ));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(CliError::Config(format!(
                "Catalog URL must start with http:// or https:// (got {:?})",
                url
            )));
        }

        if self.catalog.page_size == 0 {
            return Err(CliError::Config("Page size must be at least 1".to_string()));
        }

        if self.catalog.timeout_secs == 0 || self.catalog.connect_timeout_secs == 0 {
            return Err(CliError::Config("Timeouts must be at least 1 second".to_string()));
        }

        if self.storage.state_dir.as_os_str().is_empty() {
            return Err(CliError::Config("State directory is required".to_string()));
        }

        Ok(())
    }

    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig::new(self.catalog.base_url.clone())
            .with_page_size(self.catalog.page_size)
            .with_timeouts(
                Duration::from_secs(self.catalog.timeout_secs),
                Duration::from_secs(self.catalog.connect_timeout_secs),
            )
    }
}

// Default values
fn default_catalog() -> CatalogSettings {
    CatalogSettings {
        base_url: default_base_url(),
        page_size: default_page_size(),
        timeout_secs: default_timeout_secs(),
        connect_timeout_secs: default_connect_timeout_secs(),
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        state_dir: default_state_dir(),
    }
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            storage: default_storage(),
        }
    }
}
