//! Connection registry and event fan-out
//!
//! The registry tracks currently connected clients solely so the
//! broadcaster has a delivery list: each client registers an unbounded
//! outbound channel on connect and is removed on disconnect. Delivery is
//! fire-and-forget; a client whose channel is gone simply misses updates.
//! Disconnecting a client never touches playback state.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use airwave_common::events::ServerEvent;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

pub type ClientId = Uuid;

/// Set of connected clients and their outbound event channels.
#[derive(Default)]
pub struct ConnectionRegistry {
    clients: RwLock<HashMap<ClientId, mpsc::UnboundedSender<ServerEvent>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new client; returns its id and the receiving half of its
    /// outbound channel.
    pub fn register(&self) -> (ClientId, mpsc::UnboundedReceiver<ServerEvent>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock_write().insert(id, tx);
        (id, rx)
    }

    pub fn unregister(&self, id: ClientId) {
        self.lock_write().remove(&id);
    }

    pub fn client_count(&self) -> usize {
        self.lock_read().len()
    }

    fn lock_read(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<ClientId, mpsc::UnboundedSender<ServerEvent>>>
    {
        self.clients.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_write(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<ClientId, mpsc::UnboundedSender<ServerEvent>>>
    {
        self.clients.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fan-out facade over the registry.
///
/// Cheap to clone; the engine holds one for broadcasts and the connection
/// layer uses `send_to` for the join snapshot and per-client errors.
#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Deliver an event to every registered client, best-effort.
    pub fn broadcast(&self, event: ServerEvent) {
        let clients = self.registry.lock_read();
        let mut delivered = 0usize;
        for tx in clients.values() {
            if tx.send(event.clone()).is_ok() {
                delivered += 1;
            }
        }
        debug!(
            event = event.event_type(),
            delivered,
            clients = clients.len(),
            "broadcast"
        );
    }

    /// Deliver an event to exactly one client. Returns false if the client
    /// is no longer registered or its channel is closed.
    pub fn send_to(&self, id: ClientId, event: ServerEvent) -> bool {
        match self.registry.lock_read().get(&id) {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }

    pub fn client_count(&self) -> usize {
        self.registry.client_count()
    }
}
