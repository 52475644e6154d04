//! Integration tests for the playback synchronization engine
//!
//! Drives the engine through the same seams the WebSocket layer uses: a
//! stub catalog resolver on the way in, a registered test client's event
//! channel on the way out.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use airwave_common::events::{ServerEvent, Track};
use airwave_common::ResolveError;
use airwave_rd::registry::{Broadcaster, ClientId, ConnectionRegistry};
use airwave_rd::resolver::TrackResolver;
use airwave_rd::sync::engine::TickOutcome;
use airwave_rd::sync::{StreamHandle, SyncEngine};

/// Resolver stub backed by a fixed catalog map
struct StubResolver {
    tracks: HashMap<String, Track>,
}

impl StubResolver {
    fn with_tracks(tracks: Vec<Track>) -> Self {
        Self {
            tracks: tracks.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }
}

#[async_trait]
impl TrackResolver for StubResolver {
    async fn resolve(&self, track_id: &str) -> Result<Track, ResolveError> {
        self.tracks
            .get(track_id)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(track_id.to_string()))
    }
}

/// Test harness: engine plus one registered listener
struct TestRig {
    engine: Arc<SyncEngine>,
    registry: Arc<ConnectionRegistry>,
    broadcaster: Broadcaster,
    client_id: ClientId,
    events: mpsc::UnboundedReceiver<ServerEvent>,
}

impl TestRig {
    fn new(tracks: Vec<Track>) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = Broadcaster::new(Arc::clone(&registry));
        let resolver = Arc::new(StubResolver::with_tracks(tracks));
        let engine = SyncEngine::new(resolver, broadcaster.clone());
        let (client_id, events) = registry.register();
        Self {
            engine,
            registry,
            broadcaster,
            client_id,
            events,
        }
    }

    /// Drain every event currently queued for the test client
    fn drain(&mut self) -> Vec<ServerEvent> {
        let mut out = Vec::new();
        while let Ok(ev) = self.events.try_recv() {
            out.push(ev);
        }
        out
    }
}

fn track(id: &str, duration: u32) -> Track {
    Track {
        id: id.into(),
        title: "T".into(),
        artist: "A".into(),
        thumbnail_url: String::new(),
        duration_seconds: duration,
    }
}

#[tokio::test]
async fn load_starts_paused_at_zero_and_broadcasts() {
    let mut rig = TestRig::new(vec![track("abc", 3)]);

    let loaded = rig.engine.load_track("abc").await.unwrap();
    assert_eq!(loaded.id, "abc");

    let snapshot = rig.engine.snapshot().await;
    assert_eq!(snapshot.current_track.as_ref().unwrap().id, "abc");
    assert!(!snapshot.is_playing);
    assert_eq!(snapshot.elapsed_seconds, 0);

    let events = rig.drain();
    assert_eq!(
        events,
        vec![
            ServerEvent::track_info(Some(track("abc", 3))),
            ServerEvent::playback_state(false, 0, 3),
        ]
    );
}

#[tokio::test]
async fn full_lifecycle_ticks_to_exactly_one_track_ended() {
    let mut rig = TestRig::new(vec![track("abc", 3)]);

    rig.engine.load_track("abc").await.unwrap();
    rig.engine.play().await;
    assert!(rig.engine.snapshot().await.is_playing);
    rig.drain();

    assert_eq!(rig.engine.tick().await, TickOutcome::Advanced);
    assert_eq!(rig.engine.snapshot().await.elapsed_seconds, 1);
    assert_eq!(rig.drain(), vec![ServerEvent::playback_state(true, 1, 3)]);

    assert_eq!(rig.engine.tick().await, TickOutcome::Advanced);
    assert_eq!(rig.engine.snapshot().await.elapsed_seconds, 2);
    assert_eq!(rig.drain(), vec![ServerEvent::playback_state(true, 2, 3)]);

    // third tick reaches the duration: terminal transition
    assert_eq!(rig.engine.tick().await, TickOutcome::Stopped);
    let snapshot = rig.engine.snapshot().await;
    assert!(snapshot.current_track.is_none());
    assert!(!snapshot.is_playing);
    assert_eq!(snapshot.elapsed_seconds, 0);

    let events = rig.drain();
    assert_eq!(
        events,
        vec![
            ServerEvent::TrackEnded,
            ServerEvent::playback_state(false, 0, 0),
        ]
    );
    let ended = events
        .iter()
        .filter(|e| matches!(e, ServerEvent::TrackEnded))
        .count();
    assert_eq!(ended, 1);
}

#[tokio::test]
async fn failed_load_clears_state_for_everyone() {
    let mut rig = TestRig::new(vec![track("good", 10)]);

    // put something on the deck first
    rig.engine.load_track("good").await.unwrap();
    rig.engine.play().await;
    rig.drain();

    let err = rig.engine.load_track("bad-id").await;
    assert!(err.is_err());

    let snapshot = rig.engine.snapshot().await;
    assert!(snapshot.current_track.is_none());
    assert!(!snapshot.is_playing);
    assert_eq!(snapshot.elapsed_seconds, 0);

    assert_eq!(
        rig.drain(),
        vec![
            ServerEvent::track_info(None),
            ServerEvent::playback_state(false, 0, 0),
        ]
    );

    // engine accepts the next command after a failure
    rig.engine.load_track("good").await.unwrap();
    assert!(rig.engine.snapshot().await.current_track.is_some());
}

#[tokio::test]
async fn error_report_goes_to_the_requester_only() {
    let mut rig = TestRig::new(vec![]);
    let (_other_id, mut other_events) = rig.registry.register();

    rig.engine.load_track("nope").await.unwrap_err();
    rig.broadcaster.send_to(
        rig.client_id,
        ServerEvent::error("Could not load track information."),
    );

    // requester sees the shared clear plus its private error
    let mine = rig.drain();
    assert!(mine.contains(&ServerEvent::error("Could not load track information.")));

    // the other client sees only the broadcast clear
    let mut others = Vec::new();
    while let Ok(ev) = other_events.try_recv() {
        others.push(ev);
    }
    assert_eq!(
        others,
        vec![
            ServerEvent::track_info(None),
            ServerEvent::playback_state(false, 0, 0),
        ]
    );
}

#[tokio::test]
async fn seek_clamps_into_track_bounds() {
    let mut rig = TestRig::new(vec![track("long", 200)]);
    rig.engine.load_track("long").await.unwrap();
    rig.drain();

    rig.engine.seek(-5).await;
    assert_eq!(rig.engine.snapshot().await.elapsed_seconds, 0);
    assert_eq!(rig.drain(), vec![ServerEvent::playback_state(false, 0, 200)]);

    rig.engine.seek(250).await;
    assert_eq!(rig.engine.snapshot().await.elapsed_seconds, 200);
    assert_eq!(
        rig.drain(),
        vec![ServerEvent::playback_state(false, 200, 200)]
    );
}

#[tokio::test]
async fn seek_does_not_change_transport_status() {
    let rig = TestRig::new(vec![track("long", 200)]);
    rig.engine.load_track("long").await.unwrap();
    rig.engine.play().await;

    rig.engine.seek(50).await;
    let snapshot = rig.engine.snapshot().await;
    assert!(snapshot.is_playing);
    assert_eq!(snapshot.elapsed_seconds, 50);
}

#[tokio::test]
async fn pause_freezes_elapsed_against_late_ticks() {
    let mut rig = TestRig::new(vec![track("abc", 100)]);
    rig.engine.load_track("abc").await.unwrap();
    rig.engine.play().await;
    rig.engine.tick().await;
    rig.engine.pause().await;
    rig.drain();

    // ticks landing after pause are no-ops
    for _ in 0..5 {
        assert_eq!(rig.engine.tick().await, TickOutcome::Stopped);
    }
    let snapshot = rig.engine.snapshot().await;
    assert!(!snapshot.is_playing);
    assert_eq!(snapshot.elapsed_seconds, 1);
    assert!(rig.drain().is_empty());
}

#[tokio::test]
async fn transport_commands_without_a_track_are_silent_noops() {
    let mut rig = TestRig::new(vec![]);

    rig.engine.play().await;
    rig.engine.pause().await;
    rig.engine.seek(10).await;
    assert_eq!(rig.engine.tick().await, TickOutcome::Stopped);

    let snapshot = rig.engine.snapshot().await;
    assert!(snapshot.current_track.is_none());
    assert!(!snapshot.is_playing);
    assert_eq!(snapshot.elapsed_seconds, 0);
    assert!(rig.drain().is_empty());
}

#[tokio::test]
async fn double_play_and_double_pause_are_noops() {
    let mut rig = TestRig::new(vec![track("abc", 10)]);
    rig.engine.load_track("abc").await.unwrap();
    rig.drain();

    rig.engine.play().await;
    assert_eq!(rig.drain(), vec![ServerEvent::playback_state(true, 0, 10)]);
    rig.engine.play().await;
    assert!(rig.drain().is_empty());

    rig.engine.pause().await;
    assert_eq!(rig.drain(), vec![ServerEvent::playback_state(false, 0, 10)]);
    rig.engine.pause().await;
    assert!(rig.drain().is_empty());
}

#[tokio::test]
async fn load_replaces_active_track_and_stops_its_timer() {
    let rig = TestRig::new(vec![track("one", 100), track("two", 50)]);
    rig.engine.load_track("one").await.unwrap();
    rig.engine.play().await;
    rig.engine.tick().await;

    rig.engine.load_track("two").await.unwrap();
    let snapshot = rig.engine.snapshot().await;
    assert_eq!(snapshot.current_track.as_ref().unwrap().id, "two");
    assert!(!snapshot.is_playing);
    assert_eq!(snapshot.elapsed_seconds, 0);

    // the old timer is gone; a stray tick cannot advance the new track
    assert_eq!(rig.engine.tick().await, TickOutcome::Stopped);
    assert_eq!(rig.engine.snapshot().await.elapsed_seconds, 0);
}

#[tokio::test]
async fn load_releases_the_previous_audio_stream() {
    let rig = TestRig::new(vec![track("one", 100), track("two", 50)]);
    rig.engine.load_track("one").await.unwrap();

    let (handle, mut revoked) = StreamHandle::new("one");
    rig.engine.attach_stream(handle).await;
    assert!(revoked.try_recv().is_err());

    rig.engine.load_track("two").await.unwrap();
    assert!(revoked.try_recv().is_ok());
}

#[tokio::test]
async fn joining_client_snapshot_matches_current_state() {
    let rig = TestRig::new(vec![track("abc", 30)]);
    rig.engine.load_track("abc").await.unwrap();
    rig.engine.play().await;
    rig.engine.tick().await;
    rig.engine.tick().await;

    // what the connection layer replays to a client joining mid-playback
    let (joiner_id, mut joiner_events) = rig.registry.register();
    let snapshot = rig.engine.snapshot().await;
    rig.broadcaster.send_to(
        joiner_id,
        ServerEvent::initial_state(
            snapshot.current_track.clone(),
            snapshot.is_playing,
            snapshot.elapsed_seconds,
        ),
    );

    let initial = joiner_events.try_recv().unwrap();
    assert_eq!(
        initial,
        ServerEvent::initial_state(Some(track("abc", 30)), true, 2)
    );
}

#[tokio::test]
async fn disconnect_of_one_listener_changes_nothing() {
    let mut rig = TestRig::new(vec![track("abc", 30)]);
    let (other_id, other_events) = rig.registry.register();

    rig.engine.load_track("abc").await.unwrap();
    rig.engine.play().await;
    rig.engine.tick().await;
    let before = rig.engine.snapshot().await;
    rig.drain();

    drop(other_events);
    rig.registry.unregister(other_id);

    assert_eq!(rig.engine.snapshot().await, before);

    // the timer still advances for the remaining listener
    assert_eq!(rig.engine.tick().await, TickOutcome::Advanced);
    assert_eq!(rig.drain(), vec![ServerEvent::playback_state(true, 2, 30)]);
}

#[tokio::test]
async fn elapsed_stays_in_bounds_across_command_sequences() {
    let rig = TestRig::new(vec![track("abc", 5)]);

    rig.engine.load_track("abc").await.unwrap();
    rig.engine.seek(99).await;
    rig.engine.play().await;
    rig.engine.seek(-1).await;
    rig.engine.tick().await;
    rig.engine.pause().await;
    rig.engine.seek(3).await;
    rig.engine.play().await;

    let snapshot = rig.engine.snapshot().await;
    let duration = snapshot.duration_seconds();
    assert!(snapshot.elapsed_seconds <= duration);
    assert!(snapshot.current_track.is_some() || snapshot.elapsed_seconds == 0);
    assert!(snapshot.current_track.is_some() || !snapshot.is_playing);
}
