//! # Airwave Radio Daemon (airwave-rd)
//!
//! Server-authoritative playback synchronization for a collaborative radio.
//!
//! **Purpose:** keep every connected listener agreed on what track is
//! loaded, whether it is playing, and its elapsed position, while clients
//! join, leave, and issue commands concurrently.
//!
//! **Architecture:** a single sync engine owns the playback state and
//! processes commands and the 1-second tick sequentially; a broadcaster
//! fans resulting events out to all registered WebSocket clients.

pub mod api;
pub mod config;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod sync;

pub use config::Config;
pub use error::{Error, Result};
pub use registry::{Broadcaster, ConnectionRegistry};
pub use sync::engine::SyncEngine;
