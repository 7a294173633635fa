//! HTTP operations behind the drawing clients.
//!
//! DESIGN
//! ======
//! Three thin handlers over the event processor: id generation for
//! interactive drawing, board snapshot for (re)synchronization, and room
//! creation optionally seeded with an imported board. Handlers translate
//! store errors to status codes and own nothing else.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;
use tracing::{error, warn};

use crate::domain::DrawElement;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub room_id: String,
}

/// `GET /api/generate-id` — issue a fresh element id.
pub async fn generate_id(State(state): State<AppState>) -> Json<i64> {
    Json(state.events.generate_id())
}

/// `GET /api/board/:room_id` — snapshot of the room's current board.
pub async fn fetch_board(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<Vec<DrawElement>>, StatusCode> {
    match state.events.fetch_board(&room_id).await {
        Ok(Some(elements)) => Ok(Json(elements)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!(error = %e, %room_id, "board fetch failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// `POST /api/room` — create a room, optionally seeded with elements.
/// An empty or `null` body creates an empty room.
pub async fn create_room(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<RoomResponse>), StatusCode> {
    let elements: Vec<DrawElement> = if body.is_empty() {
        Vec::new()
    } else {
        match serde_json::from_slice::<Option<Vec<DrawElement>>>(&body) {
            Ok(parsed) => parsed.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "invalid create-room body");
                return Err(StatusCode::BAD_REQUEST);
            }
        }
    };

    match state.events.create_room(elements).await {
        Ok(room) => Ok((StatusCode::CREATED, Json(RoomResponse { room_id: room.room_id }))),
        Err(e) => {
            error!(error = %e, "room creation failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
#[path = "draw_test.rs"]
mod tests;
