//! Playback synchronization core
//!
//! The engine is the single point of mutation for the shared playback
//! state; everything else observes it through broadcast events or
//! snapshots.

pub mod engine;
pub mod state;
pub mod stream;

pub use engine::SyncEngine;
pub use state::PlaybackState;
pub use stream::StreamHandle;
