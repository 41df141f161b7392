//! Playback store - the single source of truth
//!
//! Owns [`PlayerState`] and exposes every mutation as an atomic, total
//! operation: empty queues, absent songs and unknown ids are no-ops or wrap
//! around, never errors. Operations that touch a persisted field flush the
//! persisted subset to storage before returning.

use crate::{
    events::StoreEvent,
    persistence::{self, StateStorage},
    types::{PersistedState, PlayerState},
};
use cadence_core::{RepeatMode, Song};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

/// Progress (seconds) past which "previous" restarts the current track
/// instead of going back
pub const RESTART_THRESHOLD_SECS: f64 = 3.0;

/// Playback store
///
/// Created once at start-up and handed to whoever needs it; there is no
/// global instance. The store never touches the media element: restarts are
/// left as a pending seek for the driver to apply.
pub struct PlayerStore<S: StateStorage> {
    state: PlayerState,
    storage: S,
    rng: StdRng,

    // Event queue for UI synchronization
    pending_events: Vec<StoreEvent>,

    // Seek target for the driver (restart in place)
    pending_seek: Option<f64>,

    // Set when a persisted field changed during the current operation
    dirty: bool,
}

impl<S: StateStorage> PlayerStore<S> {
    /// Create a store hydrated from `storage`
    pub fn new(storage: S) -> Self {
        Self::with_rng(storage, StdRng::from_entropy())
    }

    /// Create a store with a deterministic shuffle sequence
    pub fn with_seed(storage: S, seed: u64) -> Self {
        Self::with_rng(storage, StdRng::seed_from_u64(seed))
    }

    fn with_rng(storage: S, rng: StdRng) -> Self {
        let persisted = persistence::load_state(&storage);
        Self {
            state: PlayerState::from(persisted),
            storage,
            rng,
            pending_events: Vec::new(),
            pending_seek: None,
            dirty: false,
        }
    }

    // ===== Queries =====

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Whether a song with this id is in the liked list
    pub fn is_liked(&self, song_id: &str) -> bool {
        self.state.liked_songs.iter().any(|s| s.id == song_id)
    }

    /// Whether the current song has this id
    pub fn is_current(&self, song_id: &str) -> bool {
        self.state
            .current_song
            .as_ref()
            .is_some_and(|s| s.id == song_id)
    }

    /// Index of the current song in the queue, matched by id
    pub fn queue_position(&self) -> Option<usize> {
        let current = self.state.current_song.as_ref()?;
        self.state.queue.iter().position(|s| s.same_track(current))
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Take the pending restart seek, if any (consumed by the driver)
    pub fn take_pending_seek(&mut self) -> Option<f64> {
        self.pending_seek.take()
    }

    // ===== Current song & play state =====

    /// Bind a song to the driver and start from the top
    ///
    /// Setting a song forces `is_playing`; clearing it leaves the flag alone.
    /// Selecting the song that is already current replays it in place.
    pub fn set_current_song(&mut self, song: Option<Song>) {
        let starts = song.is_some();
        let reselected = match (&self.state.current_song, &song) {
            (Some(current), Some(next)) => current.same_track(next),
            _ => false,
        };
        if reselected {
            // Keep the fresher record; the loaded source stays bound
            self.state.current_song = song;
            self.restart_current();
        } else {
            self.replace_current(song);
        }
        if starts {
            self.set_playing_flag(true);
        }
        self.set_progress(0.0);
        self.commit();
    }

    pub fn toggle_play(&mut self) {
        let next = !self.state.is_playing;
        self.set_playing_flag(next);
        self.commit();
    }

    pub fn set_playing(&mut self, is_playing: bool) {
        self.set_playing_flag(is_playing);
        self.commit();
    }

    /// Start playback of `song` from a collection (e.g. a search result grid)
    ///
    /// A non-empty collection replaces the queue first.
    pub fn play_from_collection(&mut self, collection: Vec<Song>, song: Song) {
        if !collection.is_empty() {
            self.replace_queue(collection);
        }
        self.set_current_song(Some(song));
    }

    // ===== Queue =====

    /// Append a song unless one with the same id is already queued
    pub fn add_to_queue(&mut self, song: Song) {
        if self.state.queue.iter().any(|s| s.same_track(&song)) {
            debug!(song_id = %song.id, "Song already queued");
            return;
        }
        self.state.queue.push(song);
        self.queue_changed();
        self.commit();
    }

    /// Remove every queued entry with this id
    pub fn remove_from_queue(&mut self, song_id: &str) {
        let before = self.state.queue.len();
        self.state.queue.retain(|s| s.id != song_id);
        if self.state.queue.len() != before {
            self.queue_changed();
        }
        self.commit();
    }

    /// Empty the queue; the current song keeps playing
    pub fn clear_queue(&mut self) {
        if !self.state.queue.is_empty() {
            self.state.queue.clear();
            self.queue_changed();
        }
        self.commit();
    }

    /// Replace the whole queue (no duplicate check)
    pub fn set_queue(&mut self, songs: Vec<Song>) {
        self.replace_queue(songs);
        self.commit();
    }

    // ===== Liked songs =====

    /// Like the song, or unlike it if its id is already liked
    pub fn toggle_like(&mut self, song: Song) {
        let song_id = song.id.clone();
        let liked = if self.is_liked(&song_id) {
            self.state.liked_songs.retain(|s| s.id != song_id);
            false
        } else {
            self.state.liked_songs.push(song);
            true
        };
        self.record(StoreEvent::LikedChanged { song_id, liked });
        self.commit();
    }

    // ===== Navigation =====

    /// Advance to the next track
    ///
    /// Without shuffle the queue always wraps from the last track to the
    /// first, whatever the repeat mode. With shuffle a random track is picked,
    /// never the current one when the queue has another to offer.
    pub fn next_song(&mut self) {
        let len = self.state.queue.len();
        if len == 0 {
            return;
        }

        let current = self.queue_position();
        let next = if self.state.is_shuffle {
            let mut pick = self.rng.gen_range(0..len);
            if Some(pick) == current && len > 1 {
                pick = (pick + 1) % len;
            }
            pick
        } else {
            current.map_or(0, |i| (i + 1) % len)
        };

        debug!(from = ?current, to = next, shuffle = self.state.is_shuffle, "Next song");
        self.switch_to(next);
    }

    /// Go back
    ///
    /// More than [`RESTART_THRESHOLD_SECS`] into a track this restarts it in
    /// place; otherwise it moves to the previous queue entry, wrapping.
    pub fn prev_song(&mut self) {
        if self.state.progress > RESTART_THRESHOLD_SECS {
            self.restart_current();
            self.set_playing_flag(true);
            self.commit();
            return;
        }

        let len = self.state.queue.len();
        if len == 0 {
            return;
        }

        // Absent current song counts as index 0, an unqueued one as -1
        let current: i64 = match &self.state.current_song {
            None => 0,
            Some(_) => self.queue_position().map_or(-1, |i| i as i64),
        };
        let prev = (current - 1).rem_euclid(len as i64) as usize;

        debug!(from = current, to = prev, "Previous song");
        self.switch_to(prev);
    }

    // ===== Modes =====

    /// Flip shuffle; the queue order itself is left untouched
    pub fn toggle_shuffle(&mut self) {
        self.state.is_shuffle = !self.state.is_shuffle;
        self.record(StoreEvent::ShuffleChanged {
            enabled: self.state.is_shuffle,
        });
        self.commit();
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.state.repeat_mode = mode;
        self.record(StoreEvent::RepeatModeChanged { mode });
        self.commit();
    }

    /// Repeat button: off -> all -> one -> off
    ///
    /// Entering `one` also replays the current song from the start.
    pub fn cycle_repeat_mode(&mut self) -> RepeatMode {
        let mode = self.state.repeat_mode.cycled();
        self.state.repeat_mode = mode;
        self.record(StoreEvent::RepeatModeChanged { mode });
        if mode == RepeatMode::One && self.state.current_song.is_some() {
            self.restart_current();
        }
        self.commit();
        mode
    }

    // ===== Direct field sets (no clamping) =====

    pub fn set_volume(&mut self, volume: f64) {
        self.state.volume = volume;
        self.record(StoreEvent::VolumeChanged { volume });
        self.commit();
    }

    pub fn set_progress(&mut self, progress: f64) {
        self.state.progress = progress;
        self.record(StoreEvent::ProgressChanged { progress });
    }

    pub fn set_duration(&mut self, duration: f64) {
        self.state.duration = duration;
        self.record(StoreEvent::DurationChanged { duration });
    }

    // ===== Internal =====

    fn switch_to(&mut self, index: usize) {
        let song = self.state.queue[index].clone();
        if self
            .state
            .current_song
            .as_ref()
            .is_some_and(|c| c.same_track(&song))
        {
            // Same track again (single-entry queue): replay it
            self.restart_current();
        } else {
            self.replace_current(Some(song));
        }
        self.set_playing_flag(true);
        self.set_progress(0.0);
        self.commit();
    }

    fn restart_current(&mut self) {
        self.pending_seek = Some(0.0);
        self.set_progress(0.0);
        let song_id = self.state.current_song.as_ref().map(|s| s.id.clone());
        debug!(song_id = ?song_id, "Restarting current song");
        self.record(StoreEvent::Restarted { song_id });
    }

    fn replace_current(&mut self, song: Option<Song>) {
        let previous_song_id = self.state.current_song.as_ref().map(|s| s.id.clone());
        let song_id = song.as_ref().map(|s| s.id.clone());
        self.state.current_song = song;
        // A new track has no known duration until its metadata loads
        if song_id != previous_song_id {
            self.pending_seek = None;
            self.set_duration(0.0);
        }
        self.record(StoreEvent::TrackChanged {
            song_id,
            previous_song_id,
        });
    }

    fn set_playing_flag(&mut self, is_playing: bool) {
        if self.state.is_playing != is_playing {
            self.state.is_playing = is_playing;
            self.record(StoreEvent::PlayingChanged { is_playing });
        }
    }

    fn replace_queue(&mut self, songs: Vec<Song>) {
        self.state.queue = songs;
        self.queue_changed();
    }

    fn queue_changed(&mut self) {
        let length = self.state.queue.len();
        self.record(StoreEvent::QueueChanged { length });
    }

    fn record(&mut self, event: StoreEvent) {
        if event.is_persisted() {
            self.dirty = true;
        }
        if event.replaces_earlier() {
            let kind = std::mem::discriminant(&event);
            self.pending_events.retain(|e| std::mem::discriminant(e) != kind);
        }
        self.pending_events.push(event);
    }

    /// Flush the persisted subset if this operation changed it
    fn commit(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;

        let snapshot = PersistedState::from(&self.state);
        if let Err(e) = persistence::save_state(&mut self.storage, &snapshot) {
            warn!(error = %e, "Failed to persist player state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStorage, STORAGE_KEY};

    fn songs(ids: &[&str]) -> Vec<Song> {
        ids.iter()
            .map(|id| Song::new(*id, format!("Song {}", id)))
            .collect()
    }

    fn store_with_queue(ids: &[&str]) -> PlayerStore<MemoryStorage> {
        let mut store = PlayerStore::with_seed(MemoryStorage::new(), 7);
        store.set_queue(songs(ids));
        store
    }

    fn current_id<S: StateStorage>(store: &PlayerStore<S>) -> Option<&str> {
        store.state().current_song.as_ref().map(|s| s.id.as_str())
    }

    #[test]
    fn set_current_song_starts_playback() {
        let mut store = PlayerStore::new(MemoryStorage::new());
        store.set_progress(12.0);

        store.set_current_song(Some(Song::new("a", "A")));

        assert_eq!(current_id(&store), Some("a"));
        assert!(store.state().is_playing);
        assert_eq!(store.state().progress, 0.0);
    }

    #[test]
    fn clearing_current_song_keeps_play_flag() {
        let mut store = PlayerStore::new(MemoryStorage::new());
        store.set_playing(false);

        store.set_current_song(None);

        assert!(current_id(&store).is_none());
        assert!(!store.state().is_playing);
    }

    #[test]
    fn toggle_play_flips() {
        let mut store = PlayerStore::new(MemoryStorage::new());
        store.toggle_play();
        assert!(store.state().is_playing);
        store.toggle_play();
        assert!(!store.state().is_playing);
    }

    #[test]
    fn add_to_queue_ignores_duplicate_ids() {
        let mut store = PlayerStore::new(MemoryStorage::new());
        store.add_to_queue(Song::new("a", "A"));
        store.add_to_queue(Song::new("a", "A (remaster)"));

        assert_eq!(store.state().queue.len(), 1);
        assert_eq!(store.state().queue[0].name, "A");
    }

    #[test]
    fn set_queue_does_not_deduplicate() {
        let mut store = PlayerStore::new(MemoryStorage::new());
        store.set_queue(songs(&["a", "a", "b"]));
        assert_eq!(store.state().queue.len(), 3);
    }

    #[test]
    fn remove_from_queue_removes_all_matches() {
        let mut store = store_with_queue(&["a", "b", "a", "c"]);
        store.remove_from_queue("a");

        let ids: Vec<_> = store.state().queue.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn clear_queue_keeps_current_song() {
        let mut store = store_with_queue(&["a", "b"]);
        store.set_current_song(Some(Song::new("a", "A")));

        store.clear_queue();

        assert!(store.state().queue.is_empty());
        assert_eq!(current_id(&store), Some("a"));
    }

    #[test]
    fn next_song_on_empty_queue_is_noop() {
        let mut store = PlayerStore::new(MemoryStorage::new());
        store.drain_events();

        store.next_song();

        assert!(current_id(&store).is_none());
        assert!(!store.state().is_playing);
        assert!(store.drain_events().is_empty());
    }

    #[test]
    fn next_song_without_current_starts_at_head() {
        let mut store = store_with_queue(&["a", "b", "c"]);
        store.next_song();
        assert_eq!(current_id(&store), Some("a"));
    }

    #[test]
    fn next_song_from_unqueued_song_starts_at_head() {
        let mut store = store_with_queue(&["a", "b"]);
        store.set_current_song(Some(Song::new("standalone", "For You")));

        store.next_song();

        assert_eq!(current_id(&store), Some("a"));
    }

    #[test]
    fn next_song_ignores_repeat_off_at_end() {
        let mut store = store_with_queue(&["a", "b"]);
        store.set_current_song(Some(Song::new("b", "B")));
        store.set_repeat_mode(RepeatMode::Off);

        store.next_song();

        assert_eq!(current_id(&store), Some("a"));
        assert!(store.state().is_playing);
    }

    #[test]
    fn shuffle_never_repeats_current_when_alternatives_exist() {
        let mut store = store_with_queue(&["a", "b", "c"]);
        store.toggle_shuffle();
        store.set_current_song(Some(Song::new("b", "B")));

        for _ in 0..50 {
            let before = current_id(&store).map(str::to_string);
            store.next_song();
            assert_ne!(current_id(&store).map(str::to_string), before);
        }
    }

    #[test]
    fn shuffle_keeps_queue_order() {
        let mut store = store_with_queue(&["a", "b", "c", "d"]);
        store.toggle_shuffle();
        store.next_song();
        store.next_song();

        let ids: Vec<_> = store.state().queue.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn single_entry_queue_replays_same_song() {
        let mut store = store_with_queue(&["only"]);
        store.set_current_song(Some(Song::new("only", "Only")));
        store.take_pending_seek();
        store.set_progress(120.0);

        store.next_song();

        assert_eq!(current_id(&store), Some("only"));
        assert_eq!(store.state().progress, 0.0);
        assert_eq!(store.take_pending_seek(), Some(0.0));
    }

    #[test]
    fn reselecting_current_song_restarts_in_place() {
        let mut store = PlayerStore::new(MemoryStorage::new());
        store.set_current_song(Some(Song::new("a", "A")));
        store.set_duration(200.0);
        store.set_progress(200.0);
        store.drain_events();

        store.set_current_song(Some(Song::new("a", "A (Remastered)")));

        assert_eq!(store.take_pending_seek(), Some(0.0));
        assert_eq!(store.state().progress, 0.0);
        assert_eq!(store.state().duration, 200.0);
        assert_eq!(
            store.state().current_song.as_ref().map(|s| s.name.as_str()),
            Some("A (Remastered)")
        );
        let events = store.drain_events();
        assert!(events.contains(&StoreEvent::Restarted {
            song_id: Some("a".to_string())
        }));
        assert!(!events
            .iter()
            .any(|e| matches!(e, StoreEvent::TrackChanged { .. })));
    }

    #[test]
    fn prev_song_restarts_after_threshold() {
        let mut store = store_with_queue(&["a", "b"]);
        store.set_current_song(Some(Song::new("b", "B")));
        store.set_playing(false);
        store.set_progress(3.5);

        store.prev_song();

        assert_eq!(current_id(&store), Some("b"));
        assert_eq!(store.state().progress, 0.0);
        assert!(store.state().is_playing);
        assert_eq!(store.take_pending_seek(), Some(0.0));
    }

    #[test]
    fn prev_song_at_threshold_moves_back() {
        let mut store = store_with_queue(&["a", "b"]);
        store.set_current_song(Some(Song::new("b", "B")));
        store.set_progress(3.0);

        store.prev_song();

        assert_eq!(current_id(&store), Some("a"));
        assert_eq!(store.take_pending_seek(), None);
    }

    #[test]
    fn prev_song_wraps_to_last() {
        let mut store = store_with_queue(&["a", "b", "c"]);
        store.set_current_song(Some(Song::new("a", "A")));

        store.prev_song();

        assert_eq!(current_id(&store), Some("c"));
    }

    #[test]
    fn prev_song_without_current_goes_to_last() {
        let mut store = store_with_queue(&["a", "b", "c"]);
        store.prev_song();
        assert_eq!(current_id(&store), Some("c"));
    }

    #[test]
    fn prev_song_from_unqueued_song() {
        let mut store = store_with_queue(&["a", "b", "c"]);
        store.set_current_song(Some(Song::new("x", "X")));

        store.prev_song();

        assert_eq!(current_id(&store), Some("b"));
    }

    #[test]
    fn prev_song_on_empty_queue_is_noop() {
        let mut store = PlayerStore::new(MemoryStorage::new());
        store.set_current_song(Some(Song::new("a", "A")));

        store.prev_song();

        assert_eq!(current_id(&store), Some("a"));
    }

    #[test]
    fn toggle_like_is_symmetric() {
        let mut store = PlayerStore::new(MemoryStorage::new());
        let song = Song::new("a", "A");

        store.toggle_like(song.clone());
        assert!(store.is_liked("a"));
        store.toggle_like(song);
        assert!(!store.is_liked("a"));
        assert!(store.state().liked_songs.is_empty());
    }

    #[test]
    fn cycle_repeat_into_one_restarts() {
        let mut store = store_with_queue(&["a"]);
        store.set_current_song(Some(Song::new("a", "A")));
        store.set_progress(50.0);

        assert_eq!(store.cycle_repeat_mode(), RepeatMode::All);
        assert_eq!(store.take_pending_seek(), None);

        assert_eq!(store.cycle_repeat_mode(), RepeatMode::One);
        assert_eq!(store.state().progress, 0.0);
        assert_eq!(store.take_pending_seek(), Some(0.0));

        assert_eq!(store.cycle_repeat_mode(), RepeatMode::Off);
    }

    #[test]
    fn set_repeat_mode_has_no_side_effects() {
        let mut store = store_with_queue(&["a"]);
        store.set_current_song(Some(Song::new("a", "A")));
        store.set_progress(50.0);

        store.set_repeat_mode(RepeatMode::One);

        assert_eq!(store.state().progress, 50.0);
        assert_eq!(store.take_pending_seek(), None);
    }

    #[test]
    fn setters_do_not_clamp() {
        let mut store = PlayerStore::new(MemoryStorage::new());
        store.set_volume(1.5);
        store.set_progress(-2.0);
        store.set_duration(f64::MAX);

        assert_eq!(store.state().volume, 1.5);
        assert_eq!(store.state().progress, -2.0);
        assert_eq!(store.state().duration, f64::MAX);
    }

    #[test]
    fn switching_tracks_resets_duration() {
        let mut store = store_with_queue(&["a", "b"]);
        store.set_current_song(Some(Song::new("a", "A")));
        store.set_duration(200.0);

        store.next_song();

        assert_eq!(store.state().duration, 0.0);
    }

    #[test]
    fn play_from_collection_replaces_queue() {
        let mut store = store_with_queue(&["old"]);
        let grid = songs(&["x", "y", "z"]);

        store.play_from_collection(grid.clone(), grid[1].clone());

        assert_eq!(store.state().queue, grid);
        assert_eq!(current_id(&store), Some("y"));
        assert_eq!(store.queue_position(), Some(1));
    }

    #[test]
    fn play_from_empty_collection_keeps_queue() {
        let mut store = store_with_queue(&["a", "b"]);
        store.play_from_collection(Vec::new(), Song::new("solo", "Solo"));

        assert_eq!(store.state().queue.len(), 2);
        assert!(store.is_current("solo"));
        assert_eq!(store.queue_position(), None);
    }

    #[test]
    fn events_are_recorded_and_drained() {
        let mut store = PlayerStore::new(MemoryStorage::new());
        store.add_to_queue(Song::new("a", "A"));
        store.set_current_song(Some(Song::new("a", "A")));

        let events = store.drain_events();
        assert!(events.contains(&StoreEvent::QueueChanged { length: 1 }));
        assert!(events.contains(&StoreEvent::TrackChanged {
            song_id: Some("a".to_string()),
            previous_song_id: None,
        }));
        assert!(events.contains(&StoreEvent::PlayingChanged { is_playing: true }));
        assert!(store.drain_events().is_empty());
    }

    #[test]
    fn undrained_progress_keeps_only_latest() {
        let mut store = PlayerStore::new(MemoryStorage::new());
        store.set_current_song(Some(Song::new("a", "A")));
        store.drain_events();

        store.set_duration(240.0);
        for tick in 0..10_000 {
            store.set_progress(tick as f64 * 0.25);
        }
        store.set_volume(0.4);
        store.set_duration(241.0);

        let events = store.drain_events();
        assert_eq!(
            events,
            vec![
                StoreEvent::ProgressChanged { progress: 2499.75 },
                StoreEvent::VolumeChanged { volume: 0.4 },
                StoreEvent::DurationChanged { duration: 241.0 },
            ]
        );
    }

    #[test]
    fn only_persisted_changes_are_flushed() {
        let mut store = PlayerStore::new(MemoryStorage::new());
        store.set_progress(10.0);
        store.set_duration(100.0);
        store.toggle_play();
        assert_eq!(store.storage().writes(), 0);

        store.add_to_queue(Song::new("a", "A"));
        store.toggle_shuffle();
        store.set_volume(0.5);
        store.set_repeat_mode(RepeatMode::All);
        store.toggle_like(Song::new("a", "A"));
        assert_eq!(store.storage().writes(), 5);
    }

    #[test]
    fn hydrates_from_storage() {
        let mut first = PlayerStore::new(MemoryStorage::new());
        first.set_queue(songs(&["a", "b"]));
        first.toggle_like(Song::new("b", "B"));
        first.set_volume(0.3);
        first.set_repeat_mode(RepeatMode::One);
        first.toggle_shuffle();
        first.set_current_song(Some(Song::new("a", "A")));
        first.set_progress(30.0);

        let storage = first.into_storage();
        assert!(storage.get(STORAGE_KEY).is_some());

        let second = PlayerStore::new(storage);
        let state = second.state();
        assert_eq!(state.queue.len(), 2);
        assert_eq!(state.liked_songs.len(), 1);
        assert_eq!(state.volume, 0.3);
        assert_eq!(state.repeat_mode, RepeatMode::One);
        assert!(state.is_shuffle);
        assert!(state.current_song.is_none());
        assert!(!state.is_playing);
        assert_eq!(state.progress, 0.0);
    }
}
