//! Cadence - Playback Management
//!
//! Platform-agnostic playback state for Cadence.
//!
//! This crate provides:
//! - The playback store: current song, queue, liked songs, shuffle/repeat,
//!   volume, progress and duration behind atomic operations
//! - Queue advancement (wrap-around, shuffle, tap-back-to-restart)
//! - The playback driver that keeps a media element in line with the store
//! - Persistence of the queue, liked songs and preferences
//!
//! # Architecture
//!
//! `cadence-playback` never decodes audio. The platform's audio element is
//! reached through the [`MediaElement`] trait and storage through
//! [`StateStorage`]; both are handed in at construction.
//!
//! ```text
//! user action -> PlayerStore op -> PlaybackDriver::sync -> MediaElement
//!                     ^                                         |
//!                     +---- PlaybackDriver::handle_event <------+
//! ```
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{DownloadUrl, Song};
//! use cadence_playback::{HeadlessMedia, MediaElement, MediaEvent, MemoryStorage, Player, PlayerStore};
//!
//! let mut song = Song::new("a", "First");
//! song.download_urls = vec![DownloadUrl::new("320kbps", "https://cdn.example.com/a.mp4")];
//!
//! let store = PlayerStore::new(MemoryStorage::new());
//! let mut player = Player::new(store, HeadlessMedia::new());
//!
//! player.update(|store| store.play_from_collection(vec![song.clone()], song.clone()));
//! assert_eq!(player.driver().media().source(), Some("https://cdn.example.com/a.mp4"));
//!
//! player.handle_event(MediaEvent::LoadedMetadata(200.0));
//! player.handle_event(MediaEvent::TimeUpdate(12.0));
//! assert_eq!(player.state().progress, 12.0);
//! ```

mod driver;
mod error;
mod events;
mod media;
pub mod persistence;
mod player;
mod store;
pub mod types;

// Public exports
pub use driver::{classify, PlaybackDriver};
pub use error::{PersistenceError, PlaybackError, Result};
pub use events::StoreEvent;
pub use media::{HeadlessMedia, MediaCommand, MediaElement, MediaError, MediaErrorKind, MediaEvent};
pub use persistence::{JsonFileStorage, MemoryStorage, StateStorage, STORAGE_KEY};
pub use player::Player;
pub use store::{PlayerStore, RESTART_THRESHOLD_SECS};
pub use types::{PersistedState, PlayerState};
