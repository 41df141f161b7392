//! Shared helpers for playback integration tests

#![allow(dead_code)]

use cadence_core::{DownloadUrl, Image, Song};
use cadence_playback::{HeadlessMedia, MemoryStorage, Player, PlayerStore};

/// Song with a 96kbps and a 320kbps stream and one artwork variant
pub fn song(id: &str) -> Song {
    let mut song = Song::new(id, format!("Song {}", id));
    song.primary_artists = "Test Artist".to_string();
    song.duration_secs = Some(180.0);
    song.images = vec![Image::new("500x500", format!("https://img.test/{}.jpg", id))];
    song.download_urls = vec![
        DownloadUrl::new("96kbps", format!("https://cdn.test/{}_96.mp4", id)),
        DownloadUrl::new("320kbps", format!("https://cdn.test/{}_320.mp4", id)),
    ];
    song
}

pub fn songs(ids: &[&str]) -> Vec<Song> {
    ids.iter().map(|id| song(id)).collect()
}

pub fn stream_of(id: &str) -> String {
    format!("https://cdn.test/{}_320.mp4", id)
}

pub fn player() -> Player<HeadlessMedia, MemoryStorage> {
    Player::new(
        PlayerStore::with_seed(MemoryStorage::new(), 42),
        HeadlessMedia::new(),
    )
}

pub fn current_id(player: &Player<HeadlessMedia, MemoryStorage>) -> Option<String> {
    player.state().current_song.as_ref().map(|s| s.id.clone())
}
