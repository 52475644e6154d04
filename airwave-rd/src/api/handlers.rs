//! HTTP request handlers

use airwave_common::events::Track;
use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::AppContext;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
    port: u16,
    listeners: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackStateResponse {
    current_track: Option<Track>,
    is_playing: bool,
    elapsed_seconds: u32,
    duration_seconds: u32,
}

/// GET /health - Health check endpoint
pub async fn health(State(ctx): State<AppContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        module: "airwave-rd".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        port: ctx.port,
        listeners: ctx.registry.client_count(),
    })
}

/// GET /playback/state - Current playback snapshot
pub async fn get_playback_state(State(ctx): State<AppContext>) -> Json<PlaybackStateResponse> {
    let snapshot = ctx.engine.snapshot().await;
    Json(PlaybackStateResponse {
        duration_seconds: snapshot.duration_seconds(),
        current_track: snapshot.current_track,
        is_playing: snapshot.is_playing,
        elapsed_seconds: snapshot.elapsed_seconds,
    })
}
