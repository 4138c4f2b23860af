//! Lab presence fan-out: location and attendance-status changes for the
//! whole lab go out on one fixed global topic.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::realtime::{json_frame, Global, TopicRegistry};

/// Domain event: a user's tracked location changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationChanged {
    pub user_id: String,
    pub now_location: String,
    /// Present only when the location change also flipped the user's
    /// attendance status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Domain event: a user's attendance status was set directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChanged {
    pub user_id: String,
    pub status: String,
}

pub struct PresenceCoordinator {
    pub topic: Arc<TopicRegistry<Global>>,
}

impl PresenceCoordinator {
    pub(super) fn new() -> Self {
        Self {
            topic: Arc::new(TopicRegistry::new("presence")),
        }
    }

    pub fn location_changed(&self, event: &LocationChanged) -> usize {
        self.topic.broadcast(&Global, json_frame(&json!(event)))
    }

    pub fn status_changed(&self, event: &StatusChanged) -> usize {
        self.topic.broadcast(&Global, json_frame(&json!(event)))
    }
}
