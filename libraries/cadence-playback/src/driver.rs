//! Playback driver - bridge between the store and the media element
//!
//! The driver is the only code that touches the media element. It watches
//! the store's `current_song`, `is_playing` and `volume`, turns changes into
//! load/play/pause/volume commands, and feeds the element's timing and
//! end-of-track events back into the store.

use crate::{
    error::PlaybackError,
    media::{MediaElement, MediaError, MediaEvent},
    persistence::StateStorage,
    store::PlayerStore,
};
use cadence_core::{RepeatMode, Song};
use tracing::{debug, error, warn};

/// What the driver last reconciled against
#[derive(Debug, Clone, PartialEq)]
struct Observed {
    song_id: Option<String>,
    is_playing: bool,
}

/// Drives a [`MediaElement`] from a [`PlayerStore`]
pub struct PlaybackDriver<M: MediaElement> {
    media: M,
    observed: Option<Observed>,
    applied_volume: Option<f64>,
    last_error: Option<PlaybackError>,
}

impl<M: MediaElement> PlaybackDriver<M> {
    /// Take ownership of the media element
    pub fn new(media: M) -> Self {
        Self {
            media,
            observed: None,
            applied_volume: None,
            last_error: None,
        }
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn into_media(self) -> M {
        self.media
    }

    /// Most recent non-benign playback error
    pub fn last_error(&self) -> Option<&PlaybackError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Bring the media element in line with the store
    ///
    /// Load/play/pause rules run only when the current song (by id) or the
    /// play intent changed since the last sync. Volume is applied on its own
    /// and never causes a reload. A pending restart seek is applied first.
    pub fn sync<S: StateStorage>(&mut self, store: &mut PlayerStore<S>) {
        let seek = store.take_pending_seek();
        let state = store.state();
        let observed = Observed {
            song_id: state.current_song.as_ref().map(|s| s.id.clone()),
            is_playing: state.is_playing,
        };

        if let Some(position) = seek {
            self.media.set_current_time(position);
        }

        if self.observed.as_ref() != Some(&observed) {
            self.reconcile(state.current_song.as_ref(), state.is_playing);
            self.observed = Some(observed);
        } else if seek.is_some() && observed.is_playing {
            // Restart in place: the element may have ended, so ask again
            self.request_play();
        }

        let volume = state.volume;
        if self.applied_volume.map(f64::to_bits) != Some(volume.to_bits()) {
            self.apply_volume(volume);
            self.applied_volume = Some(volume);
        }
    }

    /// Forward a media element event into the store
    pub fn handle_event<S: StateStorage>(&mut self, store: &mut PlayerStore<S>, event: MediaEvent) {
        match event {
            MediaEvent::TimeUpdate(position) => store.set_progress(position),
            MediaEvent::LoadedMetadata(duration) => {
                // Live streams report NaN or infinity
                let duration = if duration.is_finite() && duration >= 0.0 {
                    duration
                } else {
                    0.0
                };
                store.set_duration(duration);
            }
            MediaEvent::Ended => {
                if store.state().repeat_mode == RepeatMode::One {
                    debug!("Track ended, repeating");
                    self.media.set_current_time(0.0);
                    store.set_progress(0.0);
                    self.request_play();
                } else {
                    debug!("Track ended, advancing");
                    store.next_song();
                    self.sync(store);
                }
            }
            MediaEvent::PlayRejected(err) => self.report(err),
        }
    }

    /// Move the playhead (user scrubbing)
    ///
    /// Clamps into `[0, duration]`, or to `>= 0` while the duration is unknown.
    pub fn seek<S: StateStorage>(&mut self, store: &mut PlayerStore<S>, position: f64) {
        if !position.is_finite() {
            return;
        }
        let duration = store.state().duration;
        let target = if duration > 0.0 {
            position.clamp(0.0, duration)
        } else {
            position.max(0.0)
        };
        self.media.set_current_time(target);
        store.set_progress(target);
    }

    fn reconcile(&mut self, song: Option<&Song>, is_playing: bool) {
        let Some(song) = song else {
            self.media.pause();
            return;
        };

        let Some(url) = song.stream_url() else {
            warn!(song_id = %song.id, "Song has no stream variants");
            self.media.pause();
            self.last_error = Some(PlaybackError::NoStream(song.id.clone()));
            return;
        };

        if self.media.source() != Some(url) {
            debug!(song_id = %song.id, url = %url, "Loading new source");
            self.media.pause();
            self.media.load(url);
        }

        if is_playing {
            self.request_play();
        } else {
            self.media.pause();
        }
    }

    fn request_play(&mut self) {
        if let Err(err) = self.media.play() {
            self.report(err);
        }
    }

    fn apply_volume(&mut self, volume: f64) {
        if !volume.is_finite() {
            warn!(volume, "Ignoring non-finite volume");
            return;
        }
        self.media.set_volume(volume.clamp(0.0, 1.0));
    }

    fn report(&mut self, err: MediaError) {
        let failure = classify(&err);
        if failure.is_benign() {
            debug!(error = %err, "Play request interrupted");
            return;
        }
        error!(error = %failure, "Playback error");
        self.last_error = Some(failure);
    }
}

/// Sort a play-request failure into the benign race or a real error
pub fn classify(err: &MediaError) -> PlaybackError {
    if err.is_aborted() {
        PlaybackError::Interrupted(err.message.clone())
    } else {
        PlaybackError::Rejected(err.to_string())
    }
}
