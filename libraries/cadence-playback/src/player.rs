//! Player - one store and one driver, wired together
//!
//! Constructed once at start-up and passed to whatever needs it. Every store
//! operation goes through [`Player::update`], which syncs the driver
//! afterwards, so the media element always follows the state.

use crate::{
    driver::PlaybackDriver,
    events::StoreEvent,
    media::{MediaElement, MediaEvent},
    persistence::StateStorage,
    store::PlayerStore,
    types::PlayerState,
};

/// Store and driver owned together
pub struct Player<M: MediaElement, S: StateStorage> {
    store: PlayerStore<S>,
    driver: PlaybackDriver<M>,
}

impl<M: MediaElement, S: StateStorage> Player<M, S> {
    /// Wire a hydrated store to a media element and bring the element in line
    pub fn new(store: PlayerStore<S>, media: M) -> Self {
        let mut player = Self {
            store,
            driver: PlaybackDriver::new(media),
        };
        player.driver.sync(&mut player.store);
        player
    }

    /// Run a store operation, then let the driver react to it
    ///
    /// ```rust
    /// use cadence_core::Song;
    /// use cadence_playback::{HeadlessMedia, MemoryStorage, Player, PlayerStore};
    ///
    /// let store = PlayerStore::new(MemoryStorage::new());
    /// let mut player = Player::new(store, HeadlessMedia::new());
    ///
    /// player.update(|store| store.add_to_queue(Song::new("a", "A")));
    /// player.update(|store| store.next_song());
    ///
    /// assert!(player.state().is_playing);
    /// ```
    pub fn update<R>(&mut self, op: impl FnOnce(&mut PlayerStore<S>) -> R) -> R {
        let result = op(&mut self.store);
        self.driver.sync(&mut self.store);
        result
    }

    /// Feed a media element event through the driver
    pub fn handle_event(&mut self, event: MediaEvent) {
        self.driver.handle_event(&mut self.store, event);
    }

    /// Scrub to `position` seconds
    pub fn seek(&mut self, position: f64) {
        self.driver.seek(&mut self.store, position);
    }

    pub fn state(&self) -> &PlayerState {
        self.store.state()
    }

    pub fn store(&self) -> &PlayerStore<S> {
        &self.store
    }

    pub fn driver(&self) -> &PlaybackDriver<M> {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut PlaybackDriver<M> {
        &mut self.driver
    }

    /// Take the store events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        self.store.drain_events()
    }

    pub fn into_parts(self) -> (PlayerStore<S>, M) {
        (self.store, self.driver.into_media())
    }
}
