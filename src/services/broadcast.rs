//! Topic-keyed broadcast.
//!
//! DESIGN
//! ======
//! The event processor depends only on `publish(topic, event)`; `WsHub` is
//! the production implementation, a registry of `topic -> {client -> sender}`
//! fed by the websocket route. One socket subscribes to both of its room's
//! topics (`draw/{roomId}` and `cursor/{roomId}`), so delivered payloads are
//! wrapped in a `{topic, event}` envelope — transport addressing, the event
//! value itself is exactly what the processor published.
//!
//! Delivery is best-effort in server processing order: a client whose
//! channel is full misses the frame and resynchronizes via board fetch.

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Topic name for a room's draw events.
#[must_use]
pub fn draw_topic(room_id: &str) -> String {
    format!("draw/{room_id}")
}

/// Topic name for a room's cursor events.
#[must_use]
pub fn cursor_topic(room_id: &str) -> String {
    format!("cursor/{room_id}")
}

/// Delivers a message to all current subscribers of a named topic.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn publish(&self, topic: &str, event: serde_json::Value);
}

/// Per-subscriber sender for serialized outbound payloads.
pub type Subscriber = mpsc::Sender<String>;

pub struct WsHub {
    topics: DashMap<String, HashMap<Uuid, Subscriber>>,
}

impl WsHub {
    #[must_use]
    pub fn new() -> Self {
        Self { topics: DashMap::new() }
    }

    pub fn subscribe(&self, topic: &str, client_id: Uuid, tx: Subscriber) {
        self.topics.entry(topic.to_owned()).or_default().insert(client_id, tx);
    }

    pub fn unsubscribe(&self, topic: &str, client_id: Uuid) {
        let now_empty = match self.topics.get_mut(topic) {
            Some(mut subscribers) => {
                subscribers.remove(&client_id);
                subscribers.is_empty()
            }
            None => false,
        };
        if now_empty {
            // Re-checked under the entry lock: a new subscriber may have
            // arrived between the check and the removal.
            self.topics.remove_if(topic, |_, subscribers| subscribers.is_empty());
        }
    }

    #[must_use]
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, |subscribers| subscribers.len())
    }
}

impl Default for WsHub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Broadcaster for WsHub {
    async fn publish(&self, topic: &str, event: serde_json::Value) {
        let envelope = serde_json::json!({ "topic": topic, "event": event });
        let payload = envelope.to_string();

        let Some(subscribers) = self.topics.get(topic) else {
            return;
        };
        for tx in subscribers.values() {
            // Best-effort: a client with a full channel misses this frame.
            let _ = tx.try_send(payload.clone());
        }
    }
}

#[cfg(test)]
#[path = "broadcast_test.rs"]
mod tests;
