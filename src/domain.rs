//! Domain types for rooms, boards, and the events that flow through them.
//!
//! DESIGN
//! ======
//! A `Room` owns exactly one board: a map from element id to `DrawElement`.
//! Events are transient — a `DrawEvent` carries a full element copy that
//! becomes the new stored value (last-write-wins by server arrival order),
//! and a `CursorEvent` is pure broadcast ephemera that never touches a board.
//!
//! Wire format: camelCase field names, UPPERCASE enum values. Optionals
//! serialize as explicit nulls so clients see a stable shape.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// ELEMENTS
// =============================================================================

/// Closed set of drawable primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DrawElementType {
    Line,
    Rectangle,
    Circle,
    Text,
}

/// A visual primitive on a board.
///
/// `id` is assigned server-side when absent and is non-null once stored.
/// Geometry is nullable for text-only elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawElement {
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: DrawElementType,
    pub x1: Option<i64>,
    pub y1: Option<i64>,
    pub x2: Option<i64>,
    pub y2: Option<i64>,
    pub text: Option<String>,
}

// =============================================================================
// ROOM
// =============================================================================

/// An isolated collaborative session: one opaque id, one board.
///
/// Two elements with the same id in one board are the same logical element;
/// the later write fully replaces the earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub room_id: String,
    pub board: HashMap<i64, DrawElement>,
}

impl Room {
    /// Snapshot of the board values, for the fetch-board operation.
    #[must_use]
    pub fn elements(&self) -> Vec<DrawElement> {
        self.board.values().cloned().collect()
    }
}

// =============================================================================
// EVENTS
// =============================================================================

/// Draw event taxonomy. CREATE and UPDATE are handled identically at the
/// data layer (both upsert); the distinction exists for clients replaying
/// history. There is deliberately no DELETE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DrawEventType {
    Create,
    Update,
}

/// A CREATE/UPDATE instruction carrying a full element payload.
/// `user_id` is attribution only — it plays no part in conflict resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawEvent {
    #[serde(rename = "type")]
    pub kind: DrawEventType,
    pub user_id: Option<String>,
    pub element: DrawElement,
}

/// Ephemeral pointer position. Broadcast-only, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorEvent {
    pub user_id: String,
    pub x: i64,
    pub y: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: i64) -> DrawElement {
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

    #[test]
    fn element_wire_shape_is_uppercase_type_with_explicit_nulls() {
        let json = serde_json::to_value(line(7)).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["type"], "LINE");
        assert_eq!(json["x2"], 5);
        assert!(json["text"].is_null());
    }

    #[test]
    fn text_element_deserializes_without_geometry() {
        let el: DrawElement =
            serde_json::from_str(r#"{"id":3,"type":"TEXT","x1":null,"y1":null,"x2":null,"y2":null,"text":"hi"}"#)
                .unwrap();
        assert_eq!(el.kind, DrawElementType::Text);
        assert_eq!(el.text.as_deref(), Some("hi"));
        assert!(el.x1.is_none());
    }

    #[test]
    fn draw_event_uses_camel_case_user_id() {
        let event = DrawEvent { kind: DrawEventType::Update, user_id: Some("u1".into()), element: line(1) };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "UPDATE");
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["element"]["type"], "LINE");
    }

    #[test]
    fn draw_event_user_id_is_optional() {
        let event: DrawEvent =
            serde_json::from_str(r#"{"type":"CREATE","element":{"id":1,"type":"CIRCLE","x1":1,"y1":1,"x2":2,"y2":2,"text":null}}"#)
                .unwrap();
        assert_eq!(event.kind, DrawEventType::Create);
        assert!(event.user_id.is_none());
    }

    #[test]
    fn room_board_serializes_with_stringified_element_ids() {
        let mut board = HashMap::new();
        board.insert(42, line(42));
        let room = Room { room_id: "r1".into(), board };
        let json = serde_json::to_value(&room).unwrap();
        assert_eq!(json["roomId"], "r1");
        assert_eq!(json["board"]["42"]["type"], "LINE");
    }

    #[test]
    fn cursor_event_round_trips() {
        let event = CursorEvent { user_id: "u2".into(), x: 10, y: -4 };
        let json = serde_json::to_string(&event).unwrap();
        let restored: CursorEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, event);
        assert!(json.contains("\"userId\""));
    }
}
