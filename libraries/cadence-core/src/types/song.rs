//! Catalog song types
use serde::{Deserialize, Serialize};

/// Quality tag of the preferred stream variant
pub const PREFERRED_STREAM_QUALITY: &str = "320kbps";

/// Quality tag of the preferred artwork variant
pub const PREFERRED_ARTWORK_QUALITY: &str = "500x500";

/// Album a song belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    /// Catalog album identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Catalog page for the album
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Artwork variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Quality tag, e.g. "150x150" or "500x500"
    pub quality: String,
    /// Canonical location of the image
    pub uri: String,
}

impl Image {
    pub fn new(quality: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            quality: quality.into(),
            uri: uri.into(),
        }
    }
}

/// Audio stream variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadUrl {
    /// Quality tag, e.g. "96kbps" or "320kbps"
    pub quality: String,
    /// Canonical location of the stream
    pub uri: String,
}

impl DownloadUrl {
    pub fn new(quality: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            quality: quality.into(),
            uri: uri.into(),
        }
    }
}

/// A song as returned by the catalog
///
/// Songs are immutable once fetched. Identity is the catalog `id`: queue and
/// liked-song membership compare ids only, never the full record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    /// Unique catalog identifier
    pub id: String,

    /// Song title
    pub name: String,

    /// Catalog entity type (usually "song")
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Album the song appears on
    #[serde(default)]
    pub album: Album,

    /// Release year as reported by the catalog
    #[serde(default)]
    pub year: String,

    /// Track language
    #[serde(default)]
    pub language: String,

    /// Track length in seconds, when the catalog reports one
    #[serde(default)]
    pub duration_secs: Option<f64>,

    /// Comma-separated artist names
    #[serde(default)]
    pub primary_artists: String,

    /// Artwork variants, smallest first
    #[serde(default)]
    pub images: Vec<Image>,

    /// Stream variants, lowest bitrate first
    #[serde(default)]
    pub download_urls: Vec<DownloadUrl>,
}

impl Song {
    /// Create a song with only an id and a title
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: "song".to_string(),
            ..Default::default()
        }
    }

    /// Whether both records refer to the same catalog track
    pub fn same_track(&self, other: &Song) -> bool {
        self.id == other.id
    }

    /// Stream to play for this song
    ///
    /// Prefers the 320kbps variant, otherwise the last (highest) one listed.
    /// Returns `None` when the catalog returned no stream variants.
    pub fn stream_url(&self) -> Option<&str> {
        self.download_urls
            .iter()
            .find(|u| u.quality == PREFERRED_STREAM_QUALITY)
            .or_else(|| self.download_urls.last())
            .map(|u| u.uri.as_str())
    }

    /// Artwork to display for this song, same selection rule as `stream_url`
    pub fn artwork_url(&self) -> Option<&str> {
        self.images
            .iter()
            .find(|i| i.quality == PREFERRED_ARTWORK_QUALITY)
            .or_else(|| self.images.last())
            .map(|i| i.uri.as_str())
    }
}
