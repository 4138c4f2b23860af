//! Meeting live-text fan-out, keyed by meeting id.
//!
//! The document is replaced wholesale on every commit: last writer wins, no
//! diffing and no conflict detection. Two racing editors race at the
//! persistence layer, and whichever commit lands last is the one broadcast.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::realtime::{json_frame, TopicRegistry};

/// Domain event: a meeting's shared notes were overwritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingTextReplaced {
    pub id: i64,
    pub main_text: String,
}

pub struct MeetingCoordinator {
    pub documents: Arc<TopicRegistry<i64>>,
}

impl MeetingCoordinator {
    pub(super) fn new() -> Self {
        Self {
            documents: Arc::new(TopicRegistry::new("meeting_text")),
        }
    }

    pub fn main_text_replaced(&self, event: &MeetingTextReplaced) -> usize {
        self.documents.broadcast(
            &event.id,
            json_frame(&json!({ "id": event.id, "main_text": event.main_text })),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::Connection;
    use serde_json::Value;

    #[test]
    fn last_writer_wins() {
        let coord = MeetingCoordinator::new();
        let (conn, mut rx) = Connection::channel();
        conn.open().unwrap();
        coord.documents.attach(3i64, &conn).unwrap();

        coord.main_text_replaced(&MeetingTextReplaced {
            id: 3,
            main_text: "foo".to_string(),
        });
        coord.main_text_replaced(&MeetingTextReplaced {
            id: 3,
            main_text: "bar".to_string(),
        });

        // The subscriber observes both full replacements, in commit order;
        // the final state is the last write, never a merge.
        let first: Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        let last: Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(first["main_text"], "foo");
        assert_eq!(last["main_text"], "bar");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn documents_are_isolated_by_meeting() {
        let coord = MeetingCoordinator::new();
        let (conn, mut rx) = Connection::channel();
        conn.open().unwrap();
        coord.documents.attach(3i64, &conn).unwrap();

        coord.main_text_replaced(&MeetingTextReplaced {
            id: 4,
            main_text: "other meeting".to_string(),
        });
        assert!(rx.try_recv().is_err());
    }
}
