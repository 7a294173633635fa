//! WebSocket handler — room-scoped event relay.
//!
//! DESIGN
//! ======
//! A client connects with `?room={roomId}` and is subscribed to that room's
//! draw and cursor topics. The connection then runs a `select!` loop:
//! inbound messages are parsed and handed to the event processor, hub
//! deliveries are forwarded to the socket. Malformed frames are logged and
//! dropped without closing the connection; a persistence failure after a
//! draw broadcast is logged and the loop continues.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → subscribe to `draw/{roomId}` and `cursor/{roomId}`
//! 2. Client sends `{channel, event}` messages → processor dispatch
//! 3. Hub deliveries → forwarded as `{topic, event}` envelopes
//! 4. Close → unsubscribe from both topics

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{CursorEvent, DrawEvent};
use crate::services::broadcast::{cursor_topic, draw_topic};
use crate::state::AppState;

/// Inbound client message, tagged by channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "channel", content = "event", rename_all = "lowercase")]
pub enum WsMessage {
    Draw(DrawEvent),
    Cursor(CursorEvent),
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    let Some(room_id) = params.get("room").cloned() else {
        return (StatusCode::BAD_REQUEST, "room required").into_response();
    };

    ws.on_upgrade(move |socket| run_ws(socket, state, room_id))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState, room_id: String) {
    let client_id = Uuid::new_v4();

    // Per-connection channel fed by the hub.
    let (client_tx, mut client_rx) = mpsc::channel::<String>(256);

    let draw = draw_topic(&room_id);
    let cursor = cursor_topic(&room_id);
    state.hub.subscribe(&draw, client_id, client_tx.clone());
    state.hub.subscribe(&cursor, client_id, client_tx);

    info!(%client_id, %room_id, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let Ok(msg) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        dispatch_message(&state, &room_id, client_id, &text).await;
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(payload) = client_rx.recv() => {
                if socket.send(Message::Text(payload.into())).await.is_err() {
                    break;
                }
            }
        }
    }

    state.hub.unsubscribe(&draw, client_id);
    state.hub.unsubscribe(&cursor, client_id);
    info!(%client_id, %room_id, "ws: client disconnected");
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Parse one inbound text message and hand it to the event processor.
async fn dispatch_message(state: &AppState, room_id: &str, client_id: Uuid, text: &str) {
    let msg: WsMessage = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => {
            warn!(%client_id, error = %e, "ws: invalid inbound message");
            return;
        }
    };

    match msg {
        WsMessage::Draw(event) => {
            // Broadcast already happened inside the processor when this
            // errors; the save is best-effort.
            if let Err(e) = state.events.on_draw_event(room_id, event).await {
                warn!(error = %e, %room_id, "draw event persistence failed");
            }
        }
        WsMessage::Cursor(event) => {
            state.events.on_cursor_event(room_id, event).await;
        }
    }
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
