//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the HTTP operations (create room, fetch board, generate id) and the
//! websocket endpoint under a single Axum router. CORS is wide open — the
//! drawing clients are served from a different origin.

pub mod draw;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/generate-id", get(draw::generate_id))
        .route("/api/board/{room_id}", get(draw::fetch_board))
        .route("/api/room", post(draw::create_room))
        .route("/api/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
