//! Attendance roster fan-out: create/update/delete of planned-absence
//! records on one fixed global topic, tagged with the action.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::realtime::{json_frame, Global, TopicRegistry};

/// A committed change to an attendance record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum AttendanceEvent {
    Create {
        id: i64,
        title: String,
        description: String,
        user_id: String,
        user_name: String,
        mail_send: bool,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        undecided: bool,
    },
    Update {
        id: i64,
        title: String,
        description: String,
        mail_send: bool,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        undecided: bool,
    },
    Delete {
        id: i64,
    },
}

pub struct AttendanceCoordinator {
    pub topic: Arc<TopicRegistry<Global>>,
}

impl AttendanceCoordinator {
    pub(super) fn new() -> Self {
        Self {
            topic: Arc::new(TopicRegistry::new("attendance")),
        }
    }

    pub fn record_changed(&self, event: &AttendanceEvent) -> usize {
        self.topic.broadcast(&Global, json_frame(&json!(event)))
    }
}
