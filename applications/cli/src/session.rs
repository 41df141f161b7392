//! Command execution against a persisted player and the catalog

use crate::error::{CliError, Result};
use cadence_catalog_client::{Catalog, SearchOutcome, SearchSession};
use cadence_core::{RepeatMode, Song};
use cadence_playback::{HeadlessMedia, Player, PlayerStore, StateStorage};
use clap::Subcommand;
use std::io::Write;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Search the catalog
    Search {
        /// Free-text query
        query: String,
        /// Result page (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Print the preferred stream URL of a song
    Stream {
        /// Catalog song id
        id: String,
    },
    /// Show songs similar to a song
    Suggest {
        /// Catalog song id
        id: String,
    },
    /// Like a song, or unlike it if already liked
    Like {
        /// Catalog song id
        id: String,
    },
    /// List liked songs
    Liked,
    /// Append a song to the queue
    Enqueue {
        /// Catalog song id
        id: String,
    },
    /// Remove a song from the queue
    Dequeue {
        /// Catalog song id
        id: String,
    },
    /// Show the queue
    Queue,
    /// Empty the queue
    ClearQueue,
    /// Set the output volume
    Volume {
        /// Level between 0 and 1
        level: f64,
    },
    /// Set the repeat mode
    Repeat {
        /// off, one or all
        mode: RepeatMode,
    },
    /// Toggle shuffle
    Shuffle,
    /// Show player settings and counts
    Status,
}

/// One CLI invocation: a hydrated player plus a catalog
pub struct Session<C: Catalog, S: StateStorage> {
    player: Player<HeadlessMedia, S>,
    search: SearchSession<C>,
}

impl<C: Catalog, S: StateStorage> Session<C, S> {
    pub fn new(catalog: C, storage: S) -> Self {
        let store = PlayerStore::new(storage);
        Self {
            player: Player::new(store, HeadlessMedia::new()),
            search: SearchSession::new(catalog),
        }
    }

    pub fn player(&self) -> &Player<HeadlessMedia, S> {
        &self.player
    }

    pub fn catalog(&self) -> &C {
        self.search.catalog()
    }

    pub async fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<()> {
        debug!(?command, "Executing command");

        match command {
            Command::Search { query, page } => self.run_search(&query, page, out).await,
            Command::Stream { id } => {
                let song = match self.find_known(&id) {
                    Some(song) => song,
                    None => self.fetch(&id).await?,
                };
                match song.stream_url() {
                    Some(url) => writeln!(out, "{}", url)?,
                    None => writeln!(out, "No stream available for {}", id)?,
                }
                Ok(())
            }
            Command::Suggest { id } => {
                let songs = self.search.catalog().recommendations(&id).await?;
                if songs.is_empty() {
                    writeln!(out, "No suggestions for {}", id)?;
                }
                for song in &songs {
                    write_song(out, song)?;
                }
                Ok(())
            }
            Command::Like { id } => {
                let song = match self.find_known(&id) {
                    Some(song) => song,
                    None => self.fetch(&id).await?,
                };
                let name = song.name.clone();
                self.player.update(|store| store.toggle_like(song));
                let verb = if self.player.store().is_liked(&id) {
                    "Liked"
                } else {
                    "Unliked"
                };
                info!(song_id = %id, "{}", verb);
                writeln!(out, "{} {}", verb, name)?;
                Ok(())
            }
            Command::Liked => {
                let liked = &self.player.state().liked_songs;
                if liked.is_empty() {
                    writeln!(out, "No liked songs")?;
                }
                for song in liked {
                    write_song(out, song)?;
                }
                Ok(())
            }
            Command::Enqueue { id } => {
                if self.player.state().queue.iter().any(|s| s.id == id) {
                    writeln!(out, "Already queued: {}", id)?;
                    return Ok(());
                }
                let song = match self.find_known(&id) {
                    Some(song) => song,
                    None => self.fetch(&id).await?,
                };
                let name = song.name.clone();
                self.player.update(|store| store.add_to_queue(song));
                writeln!(out, "Queued {} ({} in queue)", name, self.player.state().queue.len())?;
                Ok(())
            }
            Command::Dequeue { id } => {
                let before = self.player.state().queue.len();
                self.player.update(|store| store.remove_from_queue(&id));
                if self.player.state().queue.len() < before {
                    writeln!(out, "Removed {} from queue", id)?;
                } else {
                    writeln!(out, "Not in queue: {}", id)?;
                }
                Ok(())
            }
            Command::Queue => {
                let queue = &self.player.state().queue;
                if queue.is_empty() {
                    writeln!(out, "Queue is empty")?;
                }
                for (i, song) in queue.iter().enumerate() {
                    write!(out, "{:>3}. ", i + 1)?;
                    write_song(out, song)?;
                }
                Ok(())
            }
            Command::ClearQueue => {
                self.player.update(|store| store.clear_queue());
                writeln!(out, "Queue cleared")?;
                Ok(())
            }
            Command::Volume { level } => {
                if !(0.0..=1.0).contains(&level) {
                    return Err(CliError::InvalidArgument(format!(
                        "volume must be between 0 and 1 (got {})",
                        level
                    )));
                }
                self.player.update(|store| store.set_volume(level));
                writeln!(out, "Volume {:.0}%", level * 100.0)?;
                Ok(())
            }
            Command::Repeat { mode } => {
                self.player.update(|store| store.set_repeat_mode(mode));
                writeln!(out, "Repeat {}", mode)?;
                Ok(())
            }
            Command::Shuffle => {
                self.player.update(|store| store.toggle_shuffle());
                let state = if self.player.state().is_shuffle { "on" } else { "off" };
                writeln!(out, "Shuffle {}", state)?;
                Ok(())
            }
            Command::Status => {
                let state = self.player.state();
                writeln!(out, "Queue:   {} songs", state.queue.len())?;
                writeln!(out, "Liked:   {} songs", state.liked_songs.len())?;
                writeln!(out, "Volume:  {:.0}%", state.volume * 100.0)?;
                writeln!(out, "Repeat:  {}", state.repeat_mode)?;
                writeln!(out, "Shuffle: {}", if state.is_shuffle { "on" } else { "off" })?;
                Ok(())
            }
        }
    }

    async fn run_search<W: Write>(&self, query: &str, page: u32, out: &mut W) -> Result<()> {
        let outcome = match self.search.search(query, page).await {
            Ok(outcome) => outcome,
            // An unreachable catalog reads as no results
            Err(e) if e.is_network() => {
                warn!(query = %query.trim(), error = %e, "Search failed");
                writeln!(out, "No results for \"{}\"", query.trim())?;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        match outcome {
            SearchOutcome::Fresh { query, page } => {
                if query.is_empty() {
                    writeln!(out, "Enter a search query")?;
                    return Ok(());
                }
                if page.is_empty() {
                    writeln!(out, "No results for \"{}\"", query)?;
                    return Ok(());
                }
                writeln!(
                    out,
                    "Results for \"{}\" ({}-{} of {})",
                    query,
                    page.start + 1,
                    page.start + page.results.len() as u64,
                    page.total
                )?;
                for song in &page.results {
                    write_song(out, song)?;
                }
                Ok(())
            }
            // A single invocation runs one search, so nothing can supersede it
            SearchOutcome::Stale => Ok(()),
        }
    }

    /// Song record already held in the queue or liked list
    fn find_known(&self, id: &str) -> Option<Song> {
        let state = self.player.state();
        state
            .liked_songs
            .iter()
            .chain(state.queue.iter())
            .find(|s| s.id == id)
            .cloned()
    }

    async fn fetch(&self, id: &str) -> Result<Song> {
        self.search
            .catalog()
            .song_details(id)
            .await?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| CliError::SongNotFound(id.to_string()))
    }
}

fn write_song<W: Write>(out: &mut W, song: &Song) -> std::io::Result<()> {
    let artists = if song.primary_artists.is_empty() {
        "Unknown artist"
    } else {
        song.primary_artists.as_str()
    };
    writeln!(
        out,
        "{}  {} - {} [{}]",
        song.id,
        song.name,
        artists,
        format_duration(song.duration_secs)
    )
}

/// `m:ss`, or `--:--` when unknown
pub fn format_duration(secs: Option<f64>) -> String {
    match secs {
        Some(secs) if secs.is_finite() && secs >= 0.0 => {
            let total = secs.round() as u64;
            format!("{}:{:02}", total / 60, total % 60)
        }
        _ => "--:--".to_string(),
    }
}
