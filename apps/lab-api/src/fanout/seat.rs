//! Seat map fan-out: a committed batch update goes out verbatim as the
//! updated seat set. Clients that attach later fetch current state over
//! HTTP — there is no replay.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::realtime::{json_frame, Global, TopicRegistry};

/// One seat's occupancy state, exactly as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatRecord {
    pub id: i64,
    pub status: String,
}

pub struct SeatCoordinator {
    pub topic: Arc<TopicRegistry<Global>>,
}

impl SeatCoordinator {
    pub(super) fn new() -> Self {
        Self {
            topic: Arc::new(TopicRegistry::new("seats")),
        }
    }

    pub fn seats_updated(&self, seats: &[SeatRecord]) -> usize {
        self.topic.broadcast(&Global, json_frame(&json!(seats)))
    }
}
