//! Cadence - headless terminal front end
//!
//! Wires configuration, the catalog client and a file-persisted player
//! together. Each invocation hydrates the player, runs one command and
//! flushes whatever it changed.

pub mod config;
pub mod error;
pub mod session;

pub use config::AppConfig;
pub use error::{CliError, Result};
pub use session::{Command, Session};
