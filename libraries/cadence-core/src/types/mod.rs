mod repeat;
mod song;

pub use repeat::RepeatMode;
pub use song::{Album, DownloadUrl, Image, Song};
