//! Room event processing — the single chokepoint for inbound client events.
//!
//! DESIGN
//! ======
//! Every event is handled statelessly: broadcast to the room's topic comes
//! first and is unconditional, then draw events (the whole CREATE/UPDATE
//! taxonomy) are upserted into the store. Broadcast is the primary
//! guarantee; persistence is best-effort and its failure propagates to the
//! caller, whose policy is log-and-continue. Cursor events never touch a
//! board.
//!
//! Room creation backfills ids for seed elements that lack one — the bulk
//! "import a board" path, distinct from the per-element generate-id call
//! used during interactive drawing.

use std::sync::Arc;

use tracing::info;

use crate::domain::{CursorEvent, DrawElement, DrawEvent, DrawEventType, Room};
use crate::ids::IdIssuer;
use crate::services::broadcast::{Broadcaster, cursor_topic, draw_topic};
use crate::store::{RoomStore, StoreError};

pub struct RoomEventProcessor {
    store: Arc<dyn RoomStore>,
    ids: Arc<dyn IdIssuer>,
    broadcaster: Arc<dyn Broadcaster>,
}

impl RoomEventProcessor {
    #[must_use]
    pub fn new(store: Arc<dyn RoomStore>, ids: Arc<dyn IdIssuer>, broadcaster: Arc<dyn Broadcaster>) -> Self {
        Self { store, ids, broadcaster }
    }

    /// Handle an inbound draw event: broadcast first, then persist.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the persistence step. The broadcast has
    /// already been delivered by then.
    pub async fn on_draw_event(&self, room_id: &str, event: DrawEvent) -> Result<(), StoreError> {
        info!(
            %room_id,
            user_id = event.user_id.as_deref().unwrap_or("-"),
            kind = ?event.kind,
            element_id = ?event.element.id,
            "draw event"
        );

        let payload = serde_json::to_value(&event).unwrap_or_default();
        self.broadcaster.publish(&draw_topic(room_id), payload).await;

        match event.kind {
            DrawEventType::Create | DrawEventType::Update => self.store.save_element(room_id, event.element).await,
        }
    }

    /// Handle an inbound cursor event: broadcast only, no state.
    pub async fn on_cursor_event(&self, room_id: &str, event: CursorEvent) {
        let payload = serde_json::to_value(&event).unwrap_or_default();
        self.broadcaster.publish(&cursor_topic(room_id), payload).await;
    }

    /// Create a room seeded with `elements`, assigning ids where absent.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the room cannot be persisted.
    pub async fn create_room(&self, elements: Vec<DrawElement>) -> Result<Room, StoreError> {
        let elements = elements
            .into_iter()
            .map(|mut element| {
                if element.id.is_none() {
                    element.id = Some(self.ids.next());
                }
                element
            })
            .collect();
        self.store.save_room(elements).await
    }

    /// Snapshot of a room's current board, or `None` for an unknown room.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the lookup fails.
    pub async fn fetch_board(&self, room_id: &str) -> Result<Option<Vec<DrawElement>>, StoreError> {
        Ok(self.store.find_by_id(room_id).await?.map(|room| room.elements()))
    }

    /// Issue a fresh element id for interactive drawing.
    #[must_use]
    pub fn generate_id(&self) -> i64 {
        self.ids.next()
    }
}

#[cfg(test)]
#[path = "events_test.rs"]
mod tests;
