//! Cadence Catalog Client
//!
//! HTTP client for the public song catalog.
//!
//! # Features
//!
//! - **Search**: paged free-text song search
//! - **Details**: full song records by id
//! - **Suggestions**: songs similar to a given one
//! - **Search guard**: [`SearchSession`] drops responses superseded by a newer query
//!
//! Catalog payloads are loose (media locations under `link` or `url`,
//! durations as strings or numbers); they are normalized into
//! [`cadence_core::Song`] as soon as they are parsed.
//!
//! # Example
//!
//! ```ignore
//! use cadence_catalog_client::{CatalogClient, CatalogConfig, SearchOutcome, SearchSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CatalogClient::new(CatalogConfig::default())?;
//!     let session = SearchSession::new(client);
//!
//!     if let SearchOutcome::Fresh { page, .. } = session.search("  lofi  ", 1).await? {
//!         for song in &page.results {
//!             println!("{} - {}", song.name, song.primary_artists);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod search;
mod types;

pub use client::CatalogClient;
pub use error::{CatalogError, Result};
pub use search::{Catalog, SearchOutcome, SearchSession};
pub use types::{CatalogConfig, SearchPage, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};
