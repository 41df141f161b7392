//! Types for catalog API requests and responses.
//!
//! The `Raw*` types mirror the wire format, which is loose: media variants
//! carry their location under either `link` or `url`, and durations arrive as
//! numbers or numeric strings. Everything is normalized into `cadence_core`
//! types right after parsing.

use cadence_core::{Album, DownloadUrl, Image, Song};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Public catalog instance used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "https://saavn.sumit.co/api";

/// Results requested per search page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Configuration for connecting to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    /// Base URL of the API (e.g., "https://saavn.sumit.co/api")
    pub base_url: String,
    /// Results per search page
    pub page_size: u32,
    /// Whole-request timeout
    pub timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
}

impl CatalogConfig {
    /// Create a config for `base_url` with default limits.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_timeouts(mut self, timeout: Duration, connect_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.connect_timeout = connect_timeout;
        self
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub results: Vec<Song>,
    /// Total matches across all pages
    pub total: u64,
    /// Offset of the first result
    pub start: u64,
}

impl SearchPage {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

// =============================================================================
// Wire Types
// =============================================================================

/// `GET /search/songs` response.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<RawSearchData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSearchData {
    #[serde(default)]
    pub results: Vec<RawSong>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub start: u64,
}

/// `GET /songs/{id}` and `GET /songs/{id}/suggestions` response.
#[derive(Debug, Deserialize)]
pub(crate) struct SongsResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<RawSong>>,
}

/// Whether an envelope reports success
///
/// Older deployments send `status: "SUCCESS"`, newer ones `success: true`.
/// Absent flags count as success.
pub(crate) fn envelope_ok(status: Option<&str>, success: Option<bool>) -> bool {
    let status_failed = status
        .is_some_and(|s| s.eq_ignore_ascii_case("failed") || s.eq_ignore_ascii_case("error"));
    !status_failed && success.unwrap_or(true)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawSong {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub album: Option<RawAlbum>,
    #[serde(default)]
    pub year: Option<RawText>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub duration: Option<RawText>,
    #[serde(default)]
    pub primary_artists: Option<String>,
    #[serde(default)]
    pub image: Vec<RawMedia>,
    #[serde(default)]
    pub download_url: Vec<RawMedia>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawAlbum {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Image or download variant; the location is under `link` or `url`
#[derive(Debug, Deserialize)]
pub(crate) struct RawMedia {
    #[serde(default)]
    pub quality: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Scalar that may be sent as a string or a number
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawText {
    Number(f64),
    Text(String),
}

impl RawText {
    fn into_string(self) -> String {
        match self {
            Self::Number(n) if n.fract() == 0.0 => format!("{}", n as i64),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }

    fn as_seconds(&self) -> Option<f64> {
        let secs = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().ok()?,
        };
        (secs.is_finite() && secs >= 0.0).then_some(secs)
    }
}

// =============================================================================
// Normalization
// =============================================================================

impl RawMedia {
    fn into_uri(self) -> Option<(String, String)> {
        let uri = self.link.or(self.url).filter(|u| !u.is_empty())?;
        Some((self.quality, uri))
    }
}

impl From<RawSong> for Song {
    fn from(raw: RawSong) -> Self {
        let id = raw.id;

        let images = raw
            .image
            .into_iter()
            .filter_map(RawMedia::into_uri)
            .map(|(quality, uri)| Image::new(quality, uri))
            .collect();

        let mut dropped = 0usize;
        let download_urls = raw
            .download_url
            .into_iter()
            .filter_map(|m| {
                let variant = m.into_uri();
                if variant.is_none() {
                    dropped += 1;
                }
                variant
            })
            .map(|(quality, uri)| DownloadUrl::new(quality, uri))
            .collect();
        if dropped > 0 {
            debug!(song_id = %id, dropped, "Dropped stream variants without a location");
        }

        let album = raw.album.unwrap_or_default();

        Song {
            id,
            name: raw.name.unwrap_or_default(),
            kind: raw.kind.unwrap_or_else(|| "song".to_string()),
            album: Album {
                id: album.id.unwrap_or_default(),
                name: album.name.unwrap_or_default(),
                url: album.url.filter(|u| !u.is_empty()),
            },
            year: raw.year.map(RawText::into_string).unwrap_or_default(),
            language: raw.language.unwrap_or_default(),
            duration_secs: raw.duration.as_ref().and_then(RawText::as_seconds),
            primary_artists: raw.primary_artists.unwrap_or_default(),
            images,
            download_urls,
        }
    }
}

impl From<RawSearchData> for SearchPage {
    fn from(raw: RawSearchData) -> Self {
        Self {
            results: raw.results.into_iter().map(Song::from).collect(),
            total: raw.total,
            start: raw.start,
        }
    }
}
