//! Durable room store backed by Postgres.
//!
//! DESIGN
//! ======
//! Document layout: one row per room, `room_id` as the key and the whole
//! board as a JSONB map keyed by stringified element id. `save_element` is a
//! single field-level `jsonb_set` — never read-modify-write — so concurrent
//! upserts to other element ids in the same room are not clobbered and
//! writes to the same id linearize in the database. `save_room` is one
//! insert of the fully-formed document, `find_by_id` one point lookup.
//!
//! Connectivity failures surface as `StoreError::Unavailable`; the caller's
//! policy is log-and-drop, since the broadcast has already happened.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{DrawElement, Room};
use crate::store::{RoomStore, StoreError, build_board};

pub struct PgRoomStore {
    pool: PgPool,
}

impl PgRoomStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomStore for PgRoomStore {
    async fn find_by_id(&self, room_id: &str) -> Result<Option<Room>, StoreError> {
        let row: Option<(Json<HashMap<i64, DrawElement>>,)> =
            sqlx::query_as("SELECT board FROM rooms WHERE room_id = $1")
                .bind(room_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(board,)| Room { room_id: room_id.to_owned(), board: board.0 }))
    }

    async fn save_element(&self, room_id: &str, element: DrawElement) -> Result<(), StoreError> {
        let Some(id) = element.id else {
            warn!(%room_id, "dropping element with no id");
            return Ok(());
        };

        let result = sqlx::query("UPDATE rooms SET board = jsonb_set(board, ARRAY[$2::text], $3) WHERE room_id = $1")
            .bind(room_id)
            .bind(id.to_string())
            .bind(Json(&element))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            warn!(%room_id, element_id = id, "room not found, dropping element");
        }
        Ok(())
    }

    async fn save_room(&self, elements: Vec<DrawElement>) -> Result<Room, StoreError> {
        let room = Room { room_id: Uuid::new_v4().to_string(), board: build_board(elements) };

        sqlx::query("INSERT INTO rooms (room_id, board) VALUES ($1, $2)")
            .bind(&room.room_id)
            .bind(Json(&room.board))
            .execute(&self.pool)
            .await?;

        info!(room_id = %room.room_id, elements = room.board.len(), "created room");
        Ok(room)
    }
}

#[cfg(all(test, feature = "live-db-tests"))]
#[path = "postgres_test.rs"]
mod tests;
