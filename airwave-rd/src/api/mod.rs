//! HTTP and WebSocket surface for the radio daemon

pub mod handlers;
pub mod ws;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

use crate::registry::{Broadcaster, ConnectionRegistry};
use crate::sync::SyncEngine;

/// Shared application context passed to all handlers
#[derive(Clone)]
pub struct AppContext {
    pub engine: Arc<SyncEngine>,
    pub registry: Arc<ConnectionRegistry>,
    pub broadcaster: Broadcaster,
    pub port: u16,
}

/// Build the router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        // Health endpoint
        .route("/health", get(handlers::health))
        // Synchronous snapshot query
        .route("/playback/state", get(handlers::get_playback_state))
        // Real-time channel
        .route("/ws", get(ws::ws_handler))
        .with_state(ctx)
        // Enable CORS for local UIs
        .layer(CorsLayer::permissive())
}
