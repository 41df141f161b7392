//! Cadence Core
//!
//! Platform-agnostic domain types and error handling for Cadence.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Song`, `Album`, `Image`, `DownloadUrl`, `RepeatMode`
//! - **Media selection**: picking the stream and artwork variant of a song
//! - **Error Handling**: `CoreError` and `Result`
//!
//! Catalog responses are normalized into these types at ingestion time, so
//! every media variant carries a single canonical `uri`.
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{DownloadUrl, Song};
//!
//! let mut song = Song::new("abc123", "Night Drive");
//! song.download_urls = vec![
//!     DownloadUrl::new("96kbps", "https://cdn.example.com/abc123_96.mp4"),
//!     DownloadUrl::new("320kbps", "https://cdn.example.com/abc123_320.mp4"),
//! ];
//!
//! assert_eq!(song.stream_url(), Some("https://cdn.example.com/abc123_320.mp4"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod types;

pub use error::{CoreError, Result};
pub use types::{Album, DownloadUrl, Image, RepeatMode, Song};
