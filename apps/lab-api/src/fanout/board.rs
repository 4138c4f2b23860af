//! Bulletin board fan-out: posts and acknowledgements each have their own
//! fixed global topic.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::realtime::{json_frame, Global, TopicRegistry};

/// A committed change to a board post. A freshly created post has no
/// acknowledgements yet, so the create payload carries the zero state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum BoardEvent {
    Create {
        id: i64,
        content: String,
        created_at: DateTime<Utc>,
        group: String,
        user_id: String,
        user_name: String,
        acknowledgements: i64,
        is_acknowledged: bool,
    },
    Delete {
        id: i64,
    },
}

/// A committed change to a post's acknowledgements. Subscribers re-count;
/// only the affected board id travels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum AcknowledgementEvent {
    Create { board_id: i64 },
    Delete { board_id: i64 },
}

pub struct BoardCoordinator {
    pub posts: Arc<TopicRegistry<Global>>,
    pub acknowledgements: Arc<TopicRegistry<Global>>,
}

impl BoardCoordinator {
    pub(super) fn new() -> Self {
        Self {
            posts: Arc::new(TopicRegistry::new("board")),
            acknowledgements: Arc::new(TopicRegistry::new("acknowledgements")),
        }
    }

    pub fn post_changed(&self, event: &BoardEvent) -> usize {
        self.posts.broadcast(&Global, json_frame(&json!(event)))
    }

    pub fn acknowledgement_changed(&self, event: &AcknowledgementEvent) -> usize {
        self.acknowledgements
            .broadcast(&Global, json_frame(&json!(event)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::Connection;
    use serde_json::Value;

    fn subscribe(
        registry: &TopicRegistry<Global>,
    ) -> tokio::sync::mpsc::UnboundedReceiver<Arc<str>> {
        let (conn, rx) = Connection::channel();
        conn.open().unwrap();
        registry.attach(Global, &conn).unwrap();
        rx
    }

    #[test]
    fn created_post_carries_zero_acknowledgements() {
        let coord = BoardCoordinator::new();
        let mut rx = subscribe(&coord.posts);

        coord.post_changed(&BoardEvent::Create {
            id: 3,
            content: "cluster maintenance on friday".to_string(),
            created_at: Utc::now(),
            group: "systems".to_string(),
            user_id: "usr_alice".to_string(),
            user_name: "Alice".to_string(),
            acknowledgements: 0,
            is_acknowledged: false,
        });
        let value: Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(value["action"], "create");
        assert_eq!(value["acknowledgements"], 0);
        assert_eq!(value["is_acknowledged"], false);
    }

    #[test]
    fn acknowledgement_events_use_their_own_topic() {
        let coord = BoardCoordinator::new();
        let mut posts_rx = subscribe(&coord.posts);
        let mut acks_rx = subscribe(&coord.acknowledgements);

        coord.acknowledgement_changed(&AcknowledgementEvent::Create { board_id: 3 });
        let value: Value = serde_json::from_str(&acks_rx.try_recv().unwrap()).unwrap();
        assert_eq!(value["action"], "create");
        assert_eq!(value["board_id"], 3);
        assert!(posts_rx.try_recv().is_err());
    }
}
