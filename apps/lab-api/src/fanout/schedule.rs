//! Lab event schedule fan-out: the shared calendar's create/update/delete
//! notifications on one fixed global topic.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::realtime::{json_frame, Global, TopicRegistry};

/// A committed change to a scheduled lab event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ScheduleEvent {
    Create {
        id: i64,
        title: String,
        description: String,
        unit: String,
        user_id: String,
        user_name: String,
        mail_send: bool,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    Update {
        id: i64,
        title: String,
        description: String,
        mail_send: bool,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        unit: String,
    },
    Delete {
        id: i64,
    },
}

pub struct ScheduleCoordinator {
    pub topic: Arc<TopicRegistry<Global>>,
}

impl ScheduleCoordinator {
    pub(super) fn new() -> Self {
        Self {
            topic: Arc::new(TopicRegistry::new("schedule")),
        }
    }

    pub fn event_changed(&self, event: &ScheduleEvent) -> usize {
        self.topic.broadcast(&Global, json_frame(&json!(event)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::Connection;
    use serde_json::Value;

    #[test]
    fn update_carries_record_fields() {
        let coord = ScheduleCoordinator::new();
        let (conn, mut rx) = Connection::channel();
        conn.open().unwrap();
        coord.topic.attach(Global, &conn).unwrap();

        coord.event_changed(&ScheduleEvent::Update {
            id: 12,
            title: "journal club".to_string(),
            description: "room B".to_string(),
            mail_send: false,
            start: Utc::now(),
            end: Utc::now(),
            unit: "weekly".to_string(),
        });
        let value: Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(value["action"], "update");
        assert_eq!(value["unit"], "weekly");
        assert_eq!(value["id"], 12);
    }
}
