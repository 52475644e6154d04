//! WebSocket handler for the real-time listener channel
//!
//! Each connection registers with the registry, receives a one-time state
//! snapshot, then runs a select loop pumping broadcast events out and
//! client commands into the engine. Disconnecting performs no playback
//! mutation; playback is not paused merely because a listener leaves.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::sink::SinkExt;
use futures::stream::{SplitSink, StreamExt};
use tracing::{debug, info};

use airwave_common::events::{ClientCommand, ServerEvent};

use crate::api::AppContext;
use crate::registry::ClientId;

/// WebSocket upgrade handler for GET /ws
pub async fn ws_handler(ws: WebSocketUpgrade, State(ctx): State<AppContext>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, ctx))
}

async fn handle_socket(socket: WebSocket, ctx: AppContext) {
    let (mut sender, mut receiver) = socket.split();
    let (client_id, mut outbound) = ctx.registry.register();
    info!(%client_id, listeners = ctx.registry.client_count(), "listener connected");

    // One-time snapshot, to this client only, before any broadcast event
    let snapshot = ctx.engine.snapshot().await;
    let initial = ServerEvent::initial_state(
        snapshot.current_track,
        snapshot.is_playing,
        snapshot.elapsed_seconds,
    );
    if send_event(&mut sender, &initial).await.is_err() {
        ctx.registry.unregister(client_id);
        return;
    }

    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientCommand>(&text) {
                            Ok(command) => handle_command(&ctx, client_id, command).await,
                            Err(e) => debug!(%client_id, error = %e, "ignoring malformed command"),
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
            event = outbound.recv() => {
                match event {
                    Some(event) => {
                        if send_event(&mut sender, &event).await.is_err() {
                            break;
                        }
                    }
                    // channel closed means we were unregistered elsewhere
                    None => break,
                }
            }
        }
    }

    ctx.registry.unregister(client_id);
    info!(%client_id, listeners = ctx.registry.client_count(), "listener disconnected");
}

async fn handle_command(ctx: &AppContext, client_id: ClientId, command: ClientCommand) {
    match command {
        ClientCommand::RequestTrack { track_id } => {
            debug!(%client_id, track_id, "track requested");
            if ctx.engine.load_track(&track_id).await.is_err() {
                // failure already cleared and broadcast shared state; the
                // requesting client alone gets the error report
                ctx.broadcaster.send_to(
                    client_id,
                    ServerEvent::error("Could not load track information."),
                );
            }
        }
        ClientCommand::Play => ctx.engine.play().await,
        ClientCommand::Pause => ctx.engine.pause().await,
        ClientCommand::Seek { seconds } => ctx.engine.seek(seconds).await,
    }
}

async fn send_event(
    sender: &mut SplitSink<WebSocket, Message>,
    event: &ServerEvent,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(event).map_err(axum::Error::new)?;
    sender.send(Message::Text(json)).await
}
