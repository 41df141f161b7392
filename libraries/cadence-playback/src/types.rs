//! Core types for playback management

use cadence_core::{RepeatMode, Song};
use serde::{Deserialize, Serialize};

/// Default volume for a fresh install
pub const DEFAULT_VOLUME: f64 = 1.0;

/// The player's single mutable aggregate
///
/// Owned by [`PlayerStore`](crate::PlayerStore), which is its only writer.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    /// Track bound to the playback driver. Need not be a member of `queue`.
    pub current_song: Option<Song>,

    /// Playback order
    pub queue: Vec<Song>,

    /// Favorited songs, unique by id, insertion order preserved
    pub liked_songs: Vec<Song>,

    /// Playback intent; the driver reconciles the media element to match
    pub is_playing: bool,

    /// Pick the next track at random
    pub is_shuffle: bool,

    /// End-of-track behavior
    pub repeat_mode: RepeatMode,

    /// Output volume in [0, 1]
    pub volume: f64,

    /// Position in the current track, seconds
    pub progress: f64,

    /// Length of the current track, seconds (0 until metadata loads)
    pub duration: f64,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::from(PersistedState::default())
    }
}

impl From<PersistedState> for PlayerState {
    fn from(persisted: PersistedState) -> Self {
        Self {
            current_song: None,
            queue: persisted.queue,
            liked_songs: persisted.liked_songs,
            is_playing: false,
            is_shuffle: persisted.is_shuffle,
            repeat_mode: persisted.repeat_mode,
            volume: persisted.volume,
            progress: 0.0,
            duration: 0.0,
        }
    }
}

/// Subset of [`PlayerState`] that survives a reload
///
/// Current song, playing flag, progress and duration are transient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub queue: Vec<Song>,

    #[serde(default)]
    pub liked_songs: Vec<Song>,

    #[serde(default = "default_volume")]
    pub volume: f64,

    #[serde(default)]
    pub repeat_mode: RepeatMode,

    #[serde(default)]
    pub is_shuffle: bool,
}

fn default_volume() -> f64 {
    DEFAULT_VOLUME
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            queue: Vec::new(),
            liked_songs: Vec::new(),
            volume: DEFAULT_VOLUME,
            repeat_mode: RepeatMode::Off,
            is_shuffle: false,
        }
    }
}

impl From<&PlayerState> for PersistedState {
    fn from(state: &PlayerState) -> Self {
        Self {
            queue: state.queue.clone(),
            liked_songs: state.liked_songs.clone(),
            volume: state.volume,
            repeat_mode: state.repeat_mode,
            is_shuffle: state.is_shuffle,
        }
    }
}
