//! Store events
//!
//! Every mutating store operation records what changed. The presentation
//! layer drains these to decide what to re-render.

use cadence_core::RepeatMode;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoreEvent {
    /// Current song replaced (or cleared)
    TrackChanged {
        /// ID of the new current song
        song_id: Option<String>,
        /// ID of the song it replaced
        previous_song_id: Option<String>,
    },

    /// Current song restarted from the beginning without switching tracks
    Restarted {
        song_id: Option<String>,
    },

    /// Playback intent flipped
    PlayingChanged { is_playing: bool },

    /// Queue contents changed
    QueueChanged { length: usize },

    /// Song added to or removed from the liked list
    LikedChanged { song_id: String, liked: bool },

    ShuffleChanged { enabled: bool },

    RepeatModeChanged { mode: RepeatMode },

    VolumeChanged { volume: f64 },

    /// Position update
    ProgressChanged { progress: f64 },

    /// Track length known (or reset)
    DurationChanged { duration: f64 },
}

impl StoreEvent {
    /// Whether the event touches a persisted field
    pub fn is_persisted(&self) -> bool {
        matches!(
            self,
            Self::QueueChanged { .. }
                | Self::LikedChanged { .. }
                | Self::ShuffleChanged { .. }
                | Self::RepeatModeChanged { .. }
                | Self::VolumeChanged { .. }
        )
    }

    /// Whether only the latest undrained event of this kind matters
    ///
    /// Position and length updates arrive several times a second; a
    /// consumer that drains rarely should see the current value once.
    pub fn replaces_earlier(&self) -> bool {
        matches!(self, Self::ProgressChanged { .. } | Self::DurationChanged { .. })
    }
}
