//! Persistence adapter
//!
//! The persisted subset of the player state is stored as one JSON blob under a
//! fixed key. The medium is an opaque key-value store behind [`StateStorage`].

use crate::error::{PersistenceError, Result};
use crate::types::PersistedState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Namespace key the player state is stored under
pub const STORAGE_KEY: &str = "music-storage";

/// Version written into the blob envelope
pub const STORAGE_VERSION: u32 = 0;

/// Opaque key-value blob store
pub trait StateStorage {
    /// Read the blob stored under `key`, `None` if the key was never written
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob stored under `key`
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<T: StateStorage + ?Sized> StateStorage for Box<T> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    state: PersistedState,
    #[serde(default)]
    version: u32,
}

/// Load the persisted subset, falling back to defaults
///
/// A missing key yields defaults silently. An unreadable or corrupt blob also
/// yields defaults, with a warning, so start-up never fails on bad storage.
pub fn load_state<S: StateStorage + ?Sized>(storage: &S) -> PersistedState {
    let raw = match storage.load(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key = STORAGE_KEY, "No persisted player state, using defaults");
            return PersistedState::default();
        }
        Err(e) => {
            warn!(key = STORAGE_KEY, error = %e, "Failed to read persisted player state");
            return PersistedState::default();
        }
    };

    match serde_json::from_str::<Envelope>(&raw) {
        Ok(envelope) => {
            let mut state = envelope.state;
            if state.volume.is_finite() {
                state.volume = state.volume.clamp(0.0, 1.0);
            } else {
                state.volume = PersistedState::default().volume;
            }
            debug!(
                queue = state.queue.len(),
                liked = state.liked_songs.len(),
                version = envelope.version,
                "Hydrated player state"
            );
            state
        }
        Err(e) => {
            warn!(key = STORAGE_KEY, error = %e, "Discarding corrupt player state");
            PersistedState::default()
        }
    }
}

/// Write the persisted subset
pub fn save_state<S: StateStorage + ?Sized>(storage: &mut S, state: &PersistedState) -> Result<()> {
    let envelope = Envelope {
        state: state.clone(),
        version: STORAGE_VERSION,
    };
    let raw = serde_json::to_string(&envelope)?;
    storage.save(STORAGE_KEY, &raw)
}

/// In-memory storage, for tests and embedders that persist elsewhere
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded with one entry
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut storage = Self::new();
        storage.entries.insert(key.into(), value.into());
        storage
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of `save` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// File-backed storage: one `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Storage rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(PersistenceError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl StateStorage for JsonFileStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;

        // Write then rename so a crash never leaves a truncated blob
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}
