//! Playback primitive abstraction
//!
//! The platform's audio element (an HTML `<audio>` tag, a native player) is
//! driven through [`MediaElement`]. Decoding and output live entirely on the
//! other side of this trait.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform-provided audio element
///
/// Only [`PlaybackDriver`](crate::PlaybackDriver) calls these methods.
pub trait MediaElement {
    /// Currently loaded source, `None` before the first load
    fn source(&self) -> Option<&str>;

    /// Replace the source and reload from scratch
    fn load(&mut self, url: &str);

    /// Request playback
    ///
    /// Elements that know the outcome immediately return it here. Elements
    /// whose request settles later return `Ok(())` and report a rejection
    /// through [`MediaEvent::PlayRejected`].
    fn play(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self);

    /// Playback position in seconds
    fn current_time(&self) -> f64;

    fn set_current_time(&mut self, secs: f64);

    /// Output volume in [0, 1]
    fn volume(&self) -> f64;

    fn set_volume(&mut self, volume: f64);
}

/// Events emitted by the media element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediaEvent {
    /// Playback position moved (seconds)
    TimeUpdate(f64),

    /// Metadata loaded; total duration in seconds (may be non-finite for streams)
    LoadedMetadata(f64),

    /// Reached the end of the source
    Ended,

    /// A deferred play request was rejected
    PlayRejected(MediaError),
}

/// Why a play request failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaErrorKind {
    /// Interrupted by a later `load()` or `pause()`
    Aborted,
    /// Autoplay policy or missing user gesture
    NotAllowed,
    /// Source format or location unusable
    NotSupported,
    Other,
}

/// Play request failure reported by the media element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaError {
    pub kind: MediaErrorKind,
    pub message: String,
}

impl MediaError {
    pub fn new(kind: MediaErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Map a DOM exception name (`AbortError`, `NotAllowedError`, ...) to an error
    pub fn from_dom_name(name: &str, message: impl Into<String>) -> Self {
        let kind = match name {
            "AbortError" => MediaErrorKind::Aborted,
            "NotAllowedError" => MediaErrorKind::NotAllowed,
            "NotSupportedError" => MediaErrorKind::NotSupported,
            _ => MediaErrorKind::Other,
        };
        Self::new(kind, message)
    }

    pub fn is_aborted(&self) -> bool {
        self.kind == MediaErrorKind::Aborted
    }
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for MediaError {}

/// Command issued to a [`HeadlessMedia`]
#[derive(Debug, Clone, PartialEq)]
pub enum MediaCommand {
    Load(String),
    Play,
    Pause,
    Seek(f64),
    SetVolume(f64),
}

/// Media element without audio output
///
/// Keeps the element's observable state and a log of every command it
/// received. Used by the terminal front end and by tests.
#[derive(Debug, Clone, Default)]
pub struct HeadlessMedia {
    source: Option<String>,
    current_time: f64,
    volume: f64,
    paused: bool,
    commands: Vec<MediaCommand>,
    reject_next_play: Option<MediaError>,
}

impl HeadlessMedia {
    pub fn new() -> Self {
        Self {
            volume: 1.0,
            paused: true,
            ..Default::default()
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Every command received, oldest first
    pub fn commands(&self) -> &[MediaCommand] {
        &self.commands
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Number of `load` calls received
    pub fn load_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, MediaCommand::Load(_)))
            .count()
    }

    /// Make the next `play` call fail with `error`
    pub fn reject_next_play(&mut self, error: MediaError) {
        self.reject_next_play = Some(error);
    }

    /// Advance the playhead as if audio had played
    pub fn advance(&mut self, secs: f64) {
        self.current_time += secs;
    }
}

impl MediaElement for HeadlessMedia {
    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn load(&mut self, url: &str) {
        self.source = Some(url.to_string());
        self.current_time = 0.0;
        self.paused = true;
        self.commands.push(MediaCommand::Load(url.to_string()));
    }

    fn play(&mut self) -> Result<(), MediaError> {
        self.commands.push(MediaCommand::Play);
        if let Some(error) = self.reject_next_play.take() {
            self.paused = true;
            return Err(error);
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
        self.commands.push(MediaCommand::Pause);
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, secs: f64) {
        self.current_time = secs;
        self.commands.push(MediaCommand::Seek(secs));
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
        self.commands.push(MediaCommand::SetVolume(volume));
    }
}
