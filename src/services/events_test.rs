use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use super::*;
use crate::domain::DrawElementType;
use crate::store::memory::MemoryRoomStore;

// =============================================================================
// TEST DOUBLES
// =============================================================================

/// Records every publish so tests can assert topic and payload.
#[derive(Default)]
struct RecordingBroadcaster {
    published: Mutex<Vec<(String, serde_json::Value)>>,
}

impl RecordingBroadcaster {
    fn published(&self) -> Vec<(String, serde_json::Value)> {
        self.published.lock().expect("broadcast mutex should lock").clone()
    }
}

#[async_trait::async_trait]
impl Broadcaster for RecordingBroadcaster {
    async fn publish(&self, topic: &str, event: serde_json::Value) {
        self.published
            .lock()
            .expect("broadcast mutex should lock")
            .push((topic.to_owned(), event));
    }
}

/// Store whose every operation reports storage-unavailable.
struct FailingStore;

#[async_trait::async_trait]
impl RoomStore for FailingStore {
    async fn find_by_id(&self, _room_id: &str) -> Result<Option<Room>, StoreError> {
        Err(StoreError::Unavailable(sqlx::Error::PoolClosed))
    }

    async fn save_element(&self, _room_id: &str, _element: DrawElement) -> Result<(), StoreError> {
        Err(StoreError::Unavailable(sqlx::Error::PoolClosed))
    }

    async fn save_room(&self, _elements: Vec<DrawElement>) -> Result<Room, StoreError> {
        Err(StoreError::Unavailable(sqlx::Error::PoolClosed))
    }
}

/// Deterministic issuer starting at 100.
#[derive(Default)]
struct SeqIssuer(AtomicI64);

impl IdIssuer for SeqIssuer {
    fn next(&self) -> i64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 100
    }
}

struct Harness {
    processor: RoomEventProcessor,
    store: Arc<MemoryRoomStore>,
    broadcaster: Arc<RecordingBroadcaster>,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryRoomStore::new());
    let broadcaster = Arc::new(RecordingBroadcaster::default());
    let processor = RoomEventProcessor::new(
        store.clone(),
        Arc::new(SeqIssuer::default()),
        broadcaster.clone(),
    );
    Harness { processor, store, broadcaster }
}

fn line(id: Option<i64>, x2: i64, y2: i64) -> DrawElement {
    DrawElement {
        id,
        kind: DrawElementType::Line,
        x1: Some(0),
        y1: Some(0),
        x2: Some(x2),
        y2: Some(y2),
        text: None,
    }
}

fn draw(kind: DrawEventType, element: DrawElement) -> DrawEvent {
    DrawEvent { kind, user_id: Some("u1".into()), element }
}

// =============================================================================
// DRAW EVENTS
// =============================================================================

#[tokio::test]
async fn draw_event_broadcasts_to_the_draw_topic_and_persists() {
    let h = harness();
    let room = h.processor.create_room(Vec::new()).await.unwrap();

    h.processor
        .on_draw_event(&room.room_id, draw(DrawEventType::Create, line(Some(1), 5, 5)))
        .await
        .unwrap();

    let published = h.broadcaster.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].0, format!("draw/{}", room.room_id));
    assert_eq!(published[0].1["element"]["id"], 1);
    assert_eq!(published[0].1["userId"], "u1");

    let board = h.processor.fetch_board(&room.room_id).await.unwrap().unwrap();
    assert_eq!(board, vec![line(Some(1), 5, 5)]);
}

#[tokio::test]
async fn draw_event_broadcasts_exactly_once_even_when_persistence_fails() {
    let broadcaster = Arc::new(RecordingBroadcaster::default());
    let processor = RoomEventProcessor::new(
        Arc::new(FailingStore),
        Arc::new(SeqIssuer::default()),
        broadcaster.clone(),
    );

    let result = processor
        .on_draw_event("r1", draw(DrawEventType::Update, line(Some(1), 2, 2)))
        .await;

    assert!(matches!(result, Err(StoreError::Unavailable(_))));
    let published = broadcaster.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].0, "draw/r1");
}

#[tokio::test]
async fn update_event_replaces_the_stored_element() {
    let h = harness();
    let room = h.processor.create_room(vec![line(Some(1), 5, 5)]).await.unwrap();

    h.processor
        .on_draw_event(&room.room_id, draw(DrawEventType::Update, line(Some(1), 9, 9)))
        .await
        .unwrap();

    let board = h.processor.fetch_board(&room.room_id).await.unwrap().unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].id, Some(1));
    assert_eq!(board[0].x2, Some(9));
    assert_eq!(board[0].y2, Some(9));
}

#[tokio::test]
async fn draw_event_for_vanished_room_still_broadcasts_and_does_not_error() {
    let h = harness();

    let result = h
        .processor
        .on_draw_event("vanished", draw(DrawEventType::Create, line(Some(1), 1, 1)))
        .await;

    assert!(result.is_ok());
    assert_eq!(h.broadcaster.published().len(), 1);
    assert!(h.processor.fetch_board("vanished").await.unwrap().is_none());
    assert_eq!(h.store.room_count(), 0);
}

// =============================================================================
// CURSOR EVENTS
// =============================================================================

#[tokio::test]
async fn cursor_event_broadcasts_to_the_cursor_topic() {
    let h = harness();

    h.processor
        .on_cursor_event("r1", CursorEvent { user_id: "u2".into(), x: 3, y: 4 })
        .await;

    let published = h.broadcaster.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].0, "cursor/r1");
    assert_eq!(published[0].1["userId"], "u2");
    assert_eq!(published[0].1["x"], 3);
}

#[tokio::test]
async fn cursor_event_never_mutates_any_board() {
    let h = harness();
    let room = h.processor.create_room(vec![line(Some(1), 5, 5)]).await.unwrap();

    h.processor
        .on_cursor_event(&room.room_id, CursorEvent { user_id: "u2".into(), x: 3, y: 4 })
        .await;

    let board = h.processor.fetch_board(&room.room_id).await.unwrap().unwrap();
    assert_eq!(board, vec![line(Some(1), 5, 5)]);
}

// =============================================================================
// ROOM CREATION / BOARD FETCH
// =============================================================================

#[tokio::test]
async fn create_room_with_no_elements_fetches_as_empty_list() {
    let h = harness();
    let room = h.processor.create_room(Vec::new()).await.unwrap();

    let board = h.processor.fetch_board(&room.room_id).await.unwrap();
    assert_eq!(board, Some(Vec::new()));
}

#[tokio::test]
async fn create_room_backfills_missing_ids_and_keeps_existing_ones() {
    let h = harness();
    let room = h
        .processor
        .create_room(vec![line(None, 1, 1), line(Some(7), 2, 2), line(None, 3, 3)])
        .await
        .unwrap();

    assert_eq!(room.board.len(), 3);
    assert_eq!(room.board[&7].x2, Some(2));
    // Backfilled ids come from the issuer sequence.
    assert!(room.board.contains_key(&100));
    assert!(room.board.contains_key(&101));
}

#[tokio::test]
async fn create_room_seeded_with_duplicate_ids_keeps_the_earliest() {
    let h = harness();
    let room = h
        .processor
        .create_room(vec![line(Some(1), 10, 10), line(Some(1), 99, 99)])
        .await
        .unwrap();

    assert_eq!(room.board.len(), 1);
    assert_eq!(room.board[&1].x2, Some(10));
}

#[tokio::test]
async fn fetch_board_for_unknown_room_is_none() {
    let h = harness();
    assert!(h.processor.fetch_board("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn generate_id_delegates_to_the_issuer() {
    let h = harness();
    assert_eq!(h.processor.generate_id(), 100);
    assert_eq!(h.processor.generate_id(), 101);
}

// =============================================================================
// END TO END
// =============================================================================

#[tokio::test]
async fn seeded_line_can_be_fetched_then_updated_then_refetched() {
    let h = harness();
    let seed = line(Some(1), 5, 5);
    let room = h.processor.create_room(vec![seed.clone()]).await.unwrap();

    let board = h.processor.fetch_board(&room.room_id).await.unwrap().unwrap();
    assert_eq!(board, vec![seed]);

    h.processor
        .on_draw_event(&room.room_id, draw(DrawEventType::Update, line(Some(1), 9, 9)))
        .await
        .unwrap();

    let board = h.processor.fetch_board(&room.room_id).await.unwrap().unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].id, Some(1));
    assert_eq!((board[0].x2, board[0].y2), (Some(9), Some(9)));
}
