//! Room persistence.
//!
//! DESIGN
//! ======
//! `RoomStore` is the capability set the event processor needs: point lookup,
//! per-element upsert, and room creation. Two backends satisfy it — a
//! volatile in-process store and a Postgres-backed document store — selected
//! at startup by configuration.
//!
//! ERROR HANDLING
//! ==============
//! Room absence is a first-class result, never an error: `find_by_id` returns
//! `None` and `save_element` warn-logs and drops. By the time `save_element`
//! runs, the event has already been broadcast, so a vanished room costs at
//! most a dropped save. Only storage connectivity surfaces as `StoreError`.

pub mod memory;
pub mod postgres;

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::{DrawElement, Room};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Point lookup by room id. Absence is `Ok(None)`.
    async fn find_by_id(&self, room_id: &str) -> Result<Option<Room>, StoreError>;

    /// Upsert one element into a room's board, keyed by `element.id`.
    /// A missing room is a logged no-op, not an error.
    async fn save_element(&self, room_id: &str, element: DrawElement) -> Result<(), StoreError>;

    /// Create a room with a fresh id, seeded from `elements`.
    /// Duplicate element ids keep the earliest occurrence.
    async fn save_room(&self, elements: Vec<DrawElement>) -> Result<Room, StoreError>;
}

/// Build a board from seed elements: keyed by id, earliest duplicate wins.
/// Elements that reach the store without an id are dropped with a warning —
/// the processor backfills ids before this point.
pub(crate) fn build_board(elements: Vec<DrawElement>) -> HashMap<i64, DrawElement> {
    let mut board = HashMap::new();
    for element in elements {
        let Some(id) = element.id else {
            warn!("dropping seed element with no id");
            continue;
        };
        board.entry(id).or_insert(element);
    }
    board
}
