//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! wires the room store, the element id issuer, and the websocket hub into
//! one `RoomEventProcessor`; the hub is also held directly so the websocket
//! route can manage subscriptions.

use std::sync::Arc;

use crate::ids::{ElementIdIssuer, IdIssuer};
use crate::services::broadcast::WsHub;
use crate::services::events::RoomEventProcessor;
use crate::store::RoomStore;

/// Shared application state. Clone is required by Axum — all inner fields
/// are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<RoomEventProcessor>,
    pub hub: Arc<WsHub>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        let hub = Arc::new(WsHub::new());
        let ids: Arc<dyn IdIssuer> = Arc::new(ElementIdIssuer::new());
        let events = Arc::new(RoomEventProcessor::new(store, ids, hub.clone()));
        Self { events, hub }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use crate::domain::{DrawElement, DrawElementType};
    use crate::store::memory::MemoryRoomStore;

    /// Create a test `AppState` over a fresh in-memory store.
    #[must_use]
    pub fn test_app_state() -> AppState {
        AppState::new(Arc::new(MemoryRoomStore::new()))
    }

    /// Create a dummy line element for testing.
    #[must_use]
    pub fn dummy_line(id: i64) -> DrawElement {
        DrawElement {
            id: Some(id),
            kind: DrawElementType::Line,
            x1: Some(0),
            y1: Some(0),
            x2: Some(5),
            y2: Some(5),
            text: None,
        }
    }

    /// Seed a room through the processor and return its id.
    pub async fn seed_room(state: &AppState, elements: Vec<DrawElement>) -> String {
        state
            .events
            .create_room(elements)
            .await
            .expect("memory store save_room should not fail")
            .room_id
    }
}
