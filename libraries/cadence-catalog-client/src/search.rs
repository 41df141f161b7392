//! Catalog abstraction and the latest-query-wins search guard.

use crate::client::CatalogClient;
use crate::error::Result;
use crate::types::SearchPage;
use async_trait::async_trait;
use cadence_core::Song;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Read-only song catalog
#[async_trait]
pub trait Catalog: Send + Sync {
    /// One page of songs matching `query` (1-based `page`)
    async fn search_songs(&self, query: &str, page: u32) -> Result<SearchPage>;

    /// Full records for a song id
    async fn song_details(&self, id: &str) -> Result<Vec<Song>>;

    /// Songs similar to a song id
    async fn recommendations(&self, id: &str) -> Result<Vec<Song>>;
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn search_songs(&self, query: &str, page: u32) -> Result<SearchPage> {
        CatalogClient::search_songs(self, query, page).await
    }

    async fn song_details(&self, id: &str) -> Result<Vec<Song>> {
        CatalogClient::song_details(self, id).await
    }

    async fn recommendations(&self, id: &str) -> Result<Vec<Song>> {
        CatalogClient::recommendations(self, id).await
    }
}

/// Result of a guarded search
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Latest query's results. An empty query yields an empty page.
    Fresh { query: String, page: SearchPage },
    /// A newer search started before this one finished; drop the result
    Stale,
}

impl SearchOutcome {
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }

    /// Results to display, `None` when stale
    pub fn into_page(self) -> Option<SearchPage> {
        match self {
            Self::Fresh { page, .. } => Some(page),
            Self::Stale => None,
        }
    }
}

/// Search front door for a presentation layer
///
/// Trims queries, answers empty ones without touching the catalog, and tags
/// every request with a sequence number so a slow response can never replace
/// the results of a newer query.
pub struct SearchSession<C: Catalog> {
    catalog: C,
    latest: AtomicU64,
}

impl<C: Catalog> SearchSession<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            latest: AtomicU64::new(0),
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Run a search; errors of superseded requests are reported as `Stale`
    pub async fn search(&self, query: &str, page: u32) -> Result<SearchOutcome> {
        let query = query.trim();
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        if query.is_empty() {
            return Ok(SearchOutcome::Fresh {
                query: String::new(),
                page: SearchPage::default(),
            });
        }

        let result = self.catalog.search_songs(query, page).await;

        let latest = self.latest.load(Ordering::SeqCst);
        if latest != seq {
            debug!(query = %query, seq, latest, "Discarding stale search response");
            return Ok(SearchOutcome::Stale);
        }

        let page = result?;
        Ok(SearchOutcome::Fresh {
            query: query.to_string(),
            page,
        })
    }

    /// Invalidate any search in flight (the "clear results" action)
    pub fn clear(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}
