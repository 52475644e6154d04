//! Playback synchronization engine
//!
//! Single point of mutation for the shared playback state. The engine is a
//! sequential actor: one mutex guards the whole interior and is held across
//! every read-decide-mutate-broadcast sequence, so a seek and a tick can
//! never interleave and a broadcast payload always matches the state it was
//! computed from. The resolver call in `load_track` awaits while the lock
//! is held, which makes concurrent transport commands queue behind an
//! in-flight load instead of observing half-applied state.

use std::sync::{Arc, Weak};

use airwave_common::events::ServerEvent;
use airwave_common::events::Track;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::registry::Broadcaster;
use crate::resolver::TrackResolver;
use crate::sync::state::PlaybackState;
use crate::sync::stream::StreamHandle;

/// Whether the periodic timer should keep running after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Track still playing; elapsed advanced by one second
    Advanced,
    /// Track ended or playback stopped; the timer loop exits
    Stopped,
}

struct EngineInner {
    playback: PlaybackState,
    /// Running tick task while playing; aborted by pause and load
    tick_task: Option<JoinHandle<()>>,
    /// Byte-stream handle for the current track, released on the next load
    stream: Option<StreamHandle>,
}

/// The playback state machine shared by all connected listeners.
pub struct SyncEngine {
    broadcaster: Broadcaster,
    resolver: Arc<dyn TrackResolver>,
    /// Handle to ourselves for the spawned tick task
    weak_self: Weak<SyncEngine>,
    inner: Mutex<EngineInner>,
}

impl SyncEngine {
    pub fn new(resolver: Arc<dyn TrackResolver>, broadcaster: Broadcaster) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            broadcaster,
            resolver,
            weak_self: weak.clone(),
            inner: Mutex::new(EngineInner {
                playback: PlaybackState::empty(),
                tick_task: None,
                stream: None,
            }),
        })
    }

    /// Resolve `track_id` and make it the active track, paused at zero.
    ///
    /// On resolution failure the shared state clears for everyone and the
    /// error returns to the caller, which reports it to the requesting
    /// client alone. Either way the previous track's tick timer and byte
    /// stream are abandoned first.
    pub async fn load_track(&self, track_id: &str) -> Result<Track> {
        let mut inner = self.inner.lock().await;
        Self::cancel_tick(&mut inner);
        Self::release_stream(&mut inner);

        match self.resolver.resolve(track_id).await {
            Ok(track) => {
                info!(track_id, title = %track.title, duration = track.duration_seconds, "track loaded");
                inner.playback = PlaybackState::loaded(track.clone());
                self.broadcaster
                    .broadcast(ServerEvent::track_info(Some(track.clone())));
                self.broadcast_transport(&inner.playback);
                Ok(track)
            }
            Err(e) => {
                warn!(track_id, error = %e, "track resolution failed, clearing state");
                inner.playback = PlaybackState::empty();
                self.broadcaster.broadcast(ServerEvent::track_info(None));
                self.broadcast_transport(&inner.playback);
                Err(Error::Resolve(e))
            }
        }
    }

    /// Resume playback. No-op unless a track is loaded and paused.
    pub async fn play(&self) {
        let mut inner = self.inner.lock().await;
        if inner.playback.current_track.is_none() || inner.playback.is_playing {
            debug!("play ignored: nothing to resume");
            return;
        }
        inner.playback.is_playing = true;
        inner.playback.debug_assert_valid();
        self.broadcast_transport(&inner.playback);

        // upgrade cannot fail while a caller reaches us through the Arc
        let Some(engine) = self.weak_self.upgrade() else {
            return;
        };
        inner.tick_task = Some(tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(1));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first interval tick completes immediately; skip it so the
            // counter advances one second after play, not at play
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if engine.tick().await == TickOutcome::Stopped {
                    break;
                }
            }
        }));
    }

    /// Pause playback and stop the timer. No-op unless playing.
    pub async fn pause(&self) {
        let mut inner = self.inner.lock().await;
        if inner.playback.current_track.is_none() || !inner.playback.is_playing {
            debug!("pause ignored: nothing playing");
            return;
        }
        Self::cancel_tick(&mut inner);
        inner.playback.is_playing = false;
        inner.playback.debug_assert_valid();
        self.broadcast_transport(&inner.playback);
    }

    /// Jump to an absolute position, clamped into the track bounds.
    /// Leaves the play/pause status and the timer untouched. No-op when
    /// nothing is loaded.
    pub async fn seek(&self, target_seconds: i64) {
        let mut inner = self.inner.lock().await;
        let Some(track) = inner.playback.current_track.as_ref() else {
            debug!("seek ignored: no track loaded");
            return;
        };
        let clamped = target_seconds.clamp(0, i64::from(track.duration_seconds)) as u32;
        inner.playback.elapsed_seconds = clamped;
        inner.playback.debug_assert_valid();
        self.broadcast_transport(&inner.playback);
    }

    /// Advance elapsed time by one second. Driven by the timer task that
    /// `play` starts; a tick that lands after playback stopped is a no-op.
    ///
    /// Reaching the track's duration performs the terminal transition
    /// atomically (clear track, stop playing, reset elapsed), then
    /// broadcasts `trackEnded` followed by the empty transport state.
    pub async fn tick(&self) -> TickOutcome {
        let mut inner = self.inner.lock().await;
        if !inner.playback.is_playing {
            return TickOutcome::Stopped;
        }
        let duration = inner.playback.duration_seconds();
        inner.playback.elapsed_seconds += 1;

        if inner.playback.elapsed_seconds >= duration {
            info!("track ended");
            inner.playback = PlaybackState::empty();
            // this tick task's own handle; dropping it detaches, and the
            // loop exits via the Stopped outcome
            inner.tick_task = None;
            self.broadcaster.broadcast(ServerEvent::TrackEnded);
            self.broadcast_transport(&inner.playback);
            TickOutcome::Stopped
        } else {
            inner.playback.debug_assert_valid();
            self.broadcast_transport(&inner.playback);
            TickOutcome::Advanced
        }
    }

    /// Current state, cloned, for replay to a single newly joined client.
    pub async fn snapshot(&self) -> PlaybackState {
        self.inner.lock().await.playback.clone()
    }

    /// Record the byte-stream handle for the current track so the next
    /// load can abandon it. A handle already present is released first.
    pub async fn attach_stream(&self, handle: StreamHandle) {
        let mut inner = self.inner.lock().await;
        if let Some(old) = inner.stream.replace(handle) {
            debug!(track_id = %old.track_id(), "replacing active stream handle");
            old.release();
        }
    }

    fn cancel_tick(inner: &mut EngineInner) {
        if let Some(task) = inner.tick_task.take() {
            task.abort();
        }
    }

    // Best-effort cleanup; a stream that is already gone is logged by the
    // handle itself, never escalated.
    fn release_stream(inner: &mut EngineInner) {
        if let Some(handle) = inner.stream.take() {
            debug!(track_id = %handle.track_id(), "abandoning previous audio stream");
            handle.release();
        }
    }

    fn broadcast_transport(&self, playback: &PlaybackState) {
        self.broadcaster.broadcast(ServerEvent::playback_state(
            playback.is_playing,
            playback.elapsed_seconds,
            playback.duration_seconds(),
        ));
    }
}
