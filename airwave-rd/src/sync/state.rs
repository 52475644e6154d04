//! Shared playback state
//!
//! The single process-wide record of what is loaded and its transport
//! status. Exactly one instance exists, owned by the sync engine; other
//! components only ever see cloned snapshots.

use airwave_common::events::Track;

/// Current track, transport status, and elapsed position.
///
/// Invariants (upheld by the engine, checked by `debug_assert_valid`):
/// - `is_playing` is never true without a loaded track
/// - `elapsed_seconds` stays within `[0, duration]` while loaded, and is 0
///   when nothing is loaded
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current_track: Option<Track>,
    pub is_playing: bool,
    pub elapsed_seconds: u32,
}

impl PlaybackState {
    /// Nothing loaded; the state the process starts in and returns to when
    /// a track ends or a load fails.
    pub fn empty() -> Self {
        Self {
            current_track: None,
            is_playing: false,
            elapsed_seconds: 0,
        }
    }

    /// Fresh state for a newly loaded track: paused at position zero.
    pub fn loaded(track: Track) -> Self {
        Self {
            current_track: Some(track),
            is_playing: false,
            elapsed_seconds: 0,
        }
    }

    /// Duration of the loaded track, or 0 when empty (the value transport
    /// broadcasts carry for an empty deck).
    pub fn duration_seconds(&self) -> u32 {
        self.current_track
            .as_ref()
            .map(|t| t.duration_seconds)
            .unwrap_or(0)
    }

    pub fn debug_assert_valid(&self) {
        debug_assert!(
            self.current_track.is_some() || !self.is_playing,
            "playing without a loaded track"
        );
        debug_assert!(
            self.current_track.is_some() || self.elapsed_seconds == 0,
            "elapsed nonzero with no track"
        );
        debug_assert!(
            self.elapsed_seconds <= self.duration_seconds() || self.current_track.is_none(),
            "elapsed past track duration"
        );
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::empty()
    }
}
