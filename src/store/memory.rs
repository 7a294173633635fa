//! Volatile room store.
//!
//! DESIGN
//! ======
//! Rooms live in a sharded concurrent map for the process lifetime, and each
//! board is itself a sharded map keyed by element id. Two clients editing
//! the same room concurrently is the common case, so lock granularity is at
//! the element-id level: upserts to different ids proceed in parallel, and
//! upserts to the same id linearize on its shard (last write wins by arrival
//! order). `find_by_id` materializes a snapshot and never blocks writers of
//! unrelated keys.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{DrawElement, Room};
use crate::store::{RoomStore, StoreError, build_board};

pub struct MemoryRoomStore {
    rooms: DashMap<String, DashMap<i64, DrawElement>>,
}

impl MemoryRoomStore {
    #[must_use]
    pub fn new() -> Self {
        Self { rooms: DashMap::new() }
    }

    #[must_use]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for MemoryRoomStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    async fn find_by_id(&self, room_id: &str) -> Result<Option<Room>, StoreError> {
        let snapshot = self.rooms.get(room_id).map(|board| Room {
            room_id: room_id.to_owned(),
            board: board.iter().map(|entry| (*entry.key(), entry.value().clone())).collect(),
        });
        Ok(snapshot)
    }

    async fn save_element(&self, room_id: &str, element: DrawElement) -> Result<(), StoreError> {
        let Some(id) = element.id else {
            warn!(%room_id, "dropping element with no id");
            return Ok(());
        };
        match self.rooms.get(room_id) {
            Some(board) => {
                board.insert(id, element);
            }
            None => warn!(%room_id, element_id = id, "room not found, dropping element"),
        }
        Ok(())
    }

    async fn save_room(&self, elements: Vec<DrawElement>) -> Result<Room, StoreError> {
        let room_id = Uuid::new_v4().to_string();
        let board = build_board(elements);
        self.rooms.insert(room_id.clone(), board.iter().map(|(id, el)| (*id, el.clone())).collect());
        info!(%room_id, elements = board.len(), "created room");
        Ok(Room { room_id, board })
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
