//! Private (two-member) chat fan-out: the room topic carries the message,
//! the counterpart's chat feed and unread-total feed get a bump so their
//! room list reorders even with the room closed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::realtime::{chat_envelope, TopicRegistry};

/// A committed private message, exactly as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivateMessageRecord {
    pub id: i64,
    pub private_chat_room_id: i64,
    pub user_id: String,
    pub message_type: String,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
    pub content: String,
    pub image_name: String,
    pub image_url: String,
    pub file_name: String,
    pub file_url: String,
}

/// Domain event: a private message was committed. The counterpart member is
/// resolved by the CRUD layer before the event is handed over.
#[derive(Debug, Clone, Deserialize)]
pub struct PrivateMessagePosted {
    #[serde(flatten)]
    pub message: PrivateMessageRecord,
    pub recipient_id: String,
}

/// One row of a marked-as-read batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivateReadUpdate {
    pub id: i64,
    pub is_read: bool,
}

pub struct PrivateChatCoordinator {
    pub rooms: Arc<TopicRegistry<i64>>,
    pub feeds: Arc<TopicRegistry<String>>,
    totals: Arc<TopicRegistry<String>>,
}

impl PrivateChatCoordinator {
    pub(super) fn new(totals: Arc<TopicRegistry<String>>) -> Self {
        Self {
            rooms: Arc::new(TopicRegistry::new("private_chat_rooms")),
            feeds: Arc::new(TopicRegistry::new("private_chat_feeds")),
            totals,
        }
    }

    /// Room subscribers get the full message; the recipient's feeds get a
    /// `{updated_at, user_id}` bump. All three broadcasts happen even when a
    /// target topic has nobody attached.
    pub fn message_posted(&self, event: &PrivateMessagePosted) -> usize {
        let msg = &event.message;
        let payload = json!({
            "id": msg.id,
            "private_chat_room_id": msg.private_chat_room_id,
            "user_id": msg.user_id,
            "message_type": msg.message_type,
            "sent_at": msg.sent_at,
            "is_read": msg.is_read,
            "content": msg.content,
            "image_name": msg.image_name,
            "image_url": msg.image_url,
            "file_name": msg.file_name,
            "file_url": msg.file_url,
        });
        let room = self
            .rooms
            .broadcast(&msg.private_chat_room_id, chat_envelope("broadcast", payload));

        let note = json!({ "updated_at": msg.sent_at, "user_id": msg.user_id });
        let feed = self
            .feeds
            .broadcast(&event.recipient_id, chat_envelope("broadcast", note.clone()));
        let total = self
            .totals
            .broadcast(&event.recipient_id, chat_envelope("broadcast", note));

        tracing::debug!(
            room_id = msg.private_chat_room_id,
            recipient_id = %event.recipient_id,
            room,
            feed,
            total,
            "private message fanned out"
        );
        room + feed + total
    }

    /// A batch of messages in the room was marked read.
    pub fn reads_marked(&self, room_id: i64, updates: &[PrivateReadUpdate]) -> usize {
        self.rooms
            .broadcast(&room_id, chat_envelope("unread_update", json!(updates)))
    }

    /// A single message's read flag changed.
    pub fn message_read(&self, room_id: i64, message_id: i64, is_read: bool) -> usize {
        self.rooms.broadcast(
            &room_id,
            chat_envelope(
                "message_unread_websocket",
                json!({ "id": message_id, "is_read": is_read }),
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::Connection;
    use serde_json::Value;

    fn coordinator() -> PrivateChatCoordinator {
        PrivateChatCoordinator::new(Arc::new(TopicRegistry::new("unread_totals")))
    }

    fn subscribe<K: crate::realtime::TopicKey>(
        registry: &TopicRegistry<K>,
        key: K,
    ) -> tokio::sync::mpsc::UnboundedReceiver<Arc<str>>
    {
        let (conn, rx) = Connection::channel();
        conn.open().unwrap();
        registry.attach(key, &conn).unwrap();
        rx
    }

    fn event() -> PrivateMessagePosted {
        PrivateMessagePosted {
            message: PrivateMessageRecord {
                id: 10,
                private_chat_room_id: 7,
                user_id: "usr_alice".to_string(),
                message_type: "text".to_string(),
                sent_at: Utc::now(),
                is_read: false,
                content: "see you at the lab".to_string(),
                image_name: String::new(),
                image_url: String::new(),
                file_name: String::new(),
                file_url: String::new(),
            },
            recipient_id: "usr_bob".to_string(),
        }
    }

    #[test]
    fn message_reaches_room_and_recipient_feeds() {
        let coord = coordinator();
        let mut room_rx = subscribe(&coord.rooms, 7i64);
        let mut feed_rx = subscribe(&coord.feeds, "usr_bob".to_string());
        let mut total_rx = subscribe(&coord.totals, "usr_bob".to_string());

        let delivered = coord.message_posted(&event());
        assert_eq!(delivered, 3);

        let room: Value = serde_json::from_str(&room_rx.try_recv().unwrap()).unwrap();
        assert_eq!(room["type"], "broadcast");
        assert_eq!(room["message"]["content"], "see you at the lab");
        assert_eq!(room["message"]["private_chat_room_id"], 7);

        let note: Value = serde_json::from_str(&feed_rx.try_recv().unwrap()).unwrap();
        assert_eq!(note["message"]["user_id"], "usr_alice");
        assert!(note["message"]["updated_at"].is_string());

        let total: Value = serde_json::from_str(&total_rx.try_recv().unwrap()).unwrap();
        assert_eq!(total["message"]["user_id"], "usr_alice");
    }

    #[test]
    fn recipient_without_sockets_is_not_an_error() {
        let coord = coordinator();
        let mut room_rx = subscribe(&coord.rooms, 7i64);

        // Recipient has no feed or total sockets — the feed broadcasts are
        // no-ops and the room delivery still happens.
        assert_eq!(coord.message_posted(&event()), 1);
        assert!(room_rx.try_recv().is_ok());
    }

    #[test]
    fn other_rooms_stay_silent() {
        let coord = coordinator();
        let mut other_rx = subscribe(&coord.rooms, 8i64);

        coord.message_posted(&event());
        assert!(other_rx.try_recv().is_err());
    }

    #[test]
    fn reads_marked_broadcasts_batch() {
        let coord = coordinator();
        let mut room_rx = subscribe(&coord.rooms, 7i64);

        let updates = vec![
            PrivateReadUpdate { id: 1, is_read: true },
            PrivateReadUpdate { id: 2, is_read: true },
        ];
        assert_eq!(coord.reads_marked(7, &updates), 1);

        let value: Value = serde_json::from_str(&room_rx.try_recv().unwrap()).unwrap();
        assert_eq!(value["type"], "unread_update");
        assert_eq!(value["message"].as_array().unwrap().len(), 2);
        assert_eq!(value["message"][0]["is_read"], true);
    }

    #[test]
    fn message_read_broadcasts_flag() {
        let coord = coordinator();
        let mut room_rx = subscribe(&coord.rooms, 7i64);

        coord.message_read(7, 42, true);
        let value: Value = serde_json::from_str(&room_rx.try_recv().unwrap()).unwrap();
        assert_eq!(value["type"], "message_unread_websocket");
        assert_eq!(value["message"]["id"], 42);
        assert_eq!(value["message"]["is_read"], true);
    }
}
