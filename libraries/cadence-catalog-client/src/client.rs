//! Catalog HTTP client.

use crate::error::{CatalogError, Result};
use crate::types::{envelope_ok, CatalogConfig, SearchPage, SearchResponse, SongsResponse};
use cadence_core::Song;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Client for the song catalog API.
///
/// # Example
///
/// ```ignore
/// use cadence_catalog_client::{CatalogClient, CatalogConfig};
///
/// let client = CatalogClient::new(CatalogConfig::default())?;
/// let page = client.search_songs("lofi", 1).await?;
/// println!("{} of {} results", page.results.len(), page.total);
/// ```
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: Url,
    page_size: u32,
}

impl CatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let trimmed = config.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(CatalogError::InvalidUrl("URL cannot be empty".into()));
        }
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(CatalogError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        let base_url =
            Url::parse(trimmed).map_err(|e| CatalogError::InvalidUrl(format!("{}: {}", trimmed, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(CatalogError::InvalidUrl(trimmed.to_string()));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(format!("Cadence/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            page_size: config.page_size,
        })
    }

    /// Normalized base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Search songs by free text.
    ///
    /// `page` is 1-based. The caller trims the query; an empty query is sent
    /// as-is.
    pub async fn search_songs(&self, query: &str, page: u32) -> Result<SearchPage> {
        let mut url = self.endpoint(&["search", "songs"])?;
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("page", &page.to_string())
            .append_pair("limit", &self.page_size.to_string());

        debug!(url = %url, query = %query, page, "Searching songs");

        let response: SearchResponse = self.get_json(url, "search response").await?;
        if !envelope_ok(response.status.as_deref(), response.success) {
            return Err(CatalogError::Api(
                response.message.unwrap_or_else(|| "search failed".to_string()),
            ));
        }
        let data = response
            .data
            .ok_or_else(|| CatalogError::Parse("search response has no data".into()))?;

        let page = SearchPage::from(data);
        debug!(
            results = page.results.len(),
            total = page.total,
            start = page.start,
            "Search complete"
        );
        Ok(page)
    }

    /// Full records for one song id.
    pub async fn song_details(&self, id: &str) -> Result<Vec<Song>> {
        let url = self.endpoint(&["songs", id])?;
        debug!(url = %url, song_id = %id, "Fetching song details");
        self.get_songs(url, "song details").await
    }

    /// Songs similar to `id` ("For You" suggestions).
    pub async fn recommendations(&self, id: &str) -> Result<Vec<Song>> {
        let url = self.endpoint(&["songs", id, "suggestions"])?;
        debug!(url = %url, song_id = %id, "Fetching suggestions");
        self.get_songs(url, "suggestions").await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_songs(&self, url: Url, what: &str) -> Result<Vec<Song>> {
        let response: SongsResponse = self.get_json(url, what).await?;
        if !envelope_ok(response.status.as_deref(), response.success) {
            return Err(CatalogError::Api(
                response
                    .message
                    .unwrap_or_else(|| format!("{} request failed", what)),
            ));
        }

        let songs: Vec<Song> = response
            .data
            .unwrap_or_default()
            .into_iter()
            .map(Song::from)
            .collect();
        debug!(count = songs.len(), "Fetched {}", what);
        Ok(songs)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T> {
        let response = self.http.get(url).send().await?;

        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| CatalogError::Parse(format!("Failed to parse {}: {}", what, e)))
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(CatalogError::Network {
                status: Some(status.as_u16()),
                message: if error_text.is_empty() {
                    status.to_string()
                } else {
                    error_text
                },
            })
        }
    }
}
