//! Wire event types for the Airwave real-time channel
//!
//! Both directions of the WebSocket protocol are defined here as tagged
//! enums so every service and test speaks the same wire format:
//! - **ClientCommand**: client → server transport commands
//! - **ServerEvent**: server → client state notifications
//!
//! Events are broadcast to all connected listeners except `initialState`
//! (sent once to a joining client) and `error` (sent to the single client
//! whose request failed).

use serde::{Deserialize, Serialize};

/// Immutable metadata for a playable audio item.
///
/// Created from a catalog resolution; copied by value into the playback
/// state and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Opaque source-system identifier
    pub id: String,
    pub title: String,
    pub artist: String,
    /// May be empty when the catalog has no artwork
    #[serde(rename = "thumbnail", default)]
    pub thumbnail_url: String,
    #[serde(rename = "duration")]
    pub duration_seconds: u32,
}

/// Commands a connected client may issue over the real-time channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientCommand {
    /// Load a track by catalog id (replaces whatever is active)
    #[serde(rename_all = "camelCase")]
    RequestTrack { track_id: String },

    /// Resume playback of the loaded track
    Play,

    /// Pause playback of the loaded track
    Pause,

    /// Jump to an absolute position; out-of-range targets are clamped
    Seek { seconds: i64 },
}

/// Server → client notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// One-time replay of the current state for a newly joined client
    #[serde(rename_all = "camelCase")]
    InitialState {
        current_track: Option<Track>,
        is_playing: bool,
        elapsed_seconds: u32,
    },

    /// New track metadata (None when a load failed and state cleared)
    TrackInfo { track: Option<Track> },

    /// Transport state; sent on every state-affecting transition and tick
    #[serde(rename_all = "camelCase")]
    PlaybackState {
        is_playing: bool,
        current_time: u32,
        duration: u32,
    },

    /// A track ran to its natural end; fired exactly once per completion
    TrackEnded,

    /// Per-client failure report for a rejected track request
    Error { message: String },
}

impl ServerEvent {
    pub fn initial_state(
        current_track: Option<Track>,
        is_playing: bool,
        elapsed_seconds: u32,
    ) -> Self {
        Self::InitialState {
            current_track,
            is_playing,
            elapsed_seconds,
        }
    }

    pub fn track_info(track: Option<Track>) -> Self {
        Self::TrackInfo { track }
    }

    pub fn playback_state(is_playing: bool, current_time: u32, duration: u32) -> Self {
        Self::PlaybackState {
            is_playing,
            current_time,
            duration,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Event type as a wire string, for logging and filtering
    pub fn event_type(&self) -> &'static str {
        match self {
            ServerEvent::InitialState { .. } => "initialState",
            ServerEvent::TrackInfo { .. } => "trackInfo",
            ServerEvent::PlaybackState { .. } => "playbackState",
            ServerEvent::TrackEnded => "trackEnded",
            ServerEvent::Error { .. } => "error",
        }
    }
}
