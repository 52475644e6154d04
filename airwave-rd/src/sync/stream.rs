//! Revocable handle for an in-flight audio byte stream
//!
//! The byte-stream endpoint that actually serves audio lives outside this
//! service; it registers a handle with the engine so that loading a new
//! track can abandon the previous track's stream instead of leaking it.

use tokio::sync::oneshot;
use tracing::debug;

/// Token held by the engine for the currently streaming track.
///
/// Releasing it signals the serving task to stop. Release is best-effort:
/// a stream whose task already finished is simply gone.
#[derive(Debug)]
pub struct StreamHandle {
    track_id: String,
    revoke: oneshot::Sender<()>,
}

impl StreamHandle {
    /// Create a handle plus the revocation receiver the serving task
    /// should select on.
    pub fn new(track_id: impl Into<String>) -> (Self, oneshot::Receiver<()>) {
        let (revoke, revoked) = oneshot::channel();
        (
            Self {
                track_id: track_id.into(),
                revoke,
            },
            revoked,
        )
    }

    pub fn track_id(&self) -> &str {
        &self.track_id
    }

    /// Signal the serving task to stop. Returns false if the task was
    /// already gone.
    pub fn release(self) -> bool {
        let released = self.revoke.send(()).is_ok();
        if !released {
            debug!(track_id = %self.track_id, "stream was already closed");
        }
        released
    }
}
