//! Group chat fan-out. One message targets the room topic plus every other
//! member's group feed and unread-total feed — the two-tier pattern that
//! lets a member see activity without having the room open.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::realtime::{chat_envelope, TopicRegistry};

/// A committed group message, exactly as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMessageRecord {
    pub id: i64,
    pub group_chat_room_id: i64,
    pub user_id: String,
    pub message_type: String,
    pub sent_at: DateTime<Utc>,
    pub content: String,
    pub image_name: String,
    pub image_url: String,
    pub file_name: String,
    pub file_url: String,
}

/// Domain event: a group message was committed. `recipient_ids` is the room
/// membership minus the poster, resolved by the CRUD layer at commit time.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupMessagePosted {
    #[serde(flatten)]
    pub message: GroupMessageRecord,
    pub recipient_ids: Vec<String>,
}

/// One row of a marked-as-read batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupReadUpdate {
    pub group_message_id: i64,
}

pub struct GroupChatCoordinator {
    pub rooms: Arc<TopicRegistry<i64>>,
    pub feeds: Arc<TopicRegistry<String>>,
    totals: Arc<TopicRegistry<String>>,
}

impl GroupChatCoordinator {
    pub(super) fn new(totals: Arc<TopicRegistry<String>>) -> Self {
        Self {
            rooms: Arc::new(TopicRegistry::new("group_chat_rooms")),
            feeds: Arc::new(TopicRegistry::new("group_chat_feeds")),
            totals,
        }
    }

    /// The room payload carries `unread_count`, computed from the live
    /// subscriber count with the poster assumed attached. Members not
    /// currently viewing are covered by the persisted unread rows, which
    /// stay authoritative after a reconnect; the two counts may diverge.
    pub fn message_posted(&self, event: &GroupMessagePosted) -> usize {
        let msg = &event.message;
        let unread_count = self
            .rooms
            .subscriber_count(&msg.group_chat_room_id)
            .saturating_sub(1);
        let payload = json!({
            "id": msg.id,
            "group_chat_room_id": msg.group_chat_room_id,
            "user_id": msg.user_id,
            "message_type": msg.message_type,
            "sent_at": msg.sent_at,
            "content": msg.content,
            "image_name": msg.image_name,
            "image_url": msg.image_url,
            "file_name": msg.file_name,
            "file_url": msg.file_url,
            "unread_count": unread_count,
        });
        let room = self
            .rooms
            .broadcast(&msg.group_chat_room_id, chat_envelope("broadcast", payload));

        let note = json!({
            "updated_at": msg.sent_at,
            "group_chat_room_id": msg.group_chat_room_id,
        });
        let mut feeds = 0;
        for recipient_id in &event.recipient_ids {
            feeds += self
                .feeds
                .broadcast(recipient_id, chat_envelope("broadcast", note.clone()));
            feeds += self
                .totals
                .broadcast(recipient_id, chat_envelope("broadcast", note.clone()));
        }

        tracing::debug!(
            room_id = msg.group_chat_room_id,
            recipients = event.recipient_ids.len(),
            unread_count,
            room,
            feeds,
            "group message fanned out"
        );
        room + feeds
    }

    /// A batch of messages in the room was marked read by one member.
    pub fn reads_marked(&self, room_id: i64, updates: &[GroupReadUpdate]) -> usize {
        self.rooms
            .broadcast(&room_id, chat_envelope("unread_update", json!(updates)))
    }

    /// A single message was read by one member.
    pub fn message_read(&self, room_id: i64, group_message_id: i64) -> usize {
        self.rooms.broadcast(
            &room_id,
            chat_envelope("message_unread_websocket", json!({ "id": group_message_id })),
        )
    }
}
