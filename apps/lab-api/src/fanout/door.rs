//! Door status fan-out. The door sensor's feed is the one topic that speaks
//! raw text frames rather than JSON.

use std::sync::Arc;

use serde::Deserialize;

use crate::realtime::{Global, TopicRegistry};

/// Domain event: the door sensor posted a status reading.
#[derive(Debug, Clone, Deserialize)]
pub struct DoorStatusPosted {
    pub status: String,
}

pub struct DoorCoordinator {
    pub topic: Arc<TopicRegistry<Global>>,
}

impl DoorCoordinator {
    pub(super) fn new() -> Self {
        Self {
            topic: Arc::new(TopicRegistry::new("door")),
        }
    }

    /// The status string goes out verbatim, unwrapped.
    pub fn status_posted(&self, status: &str) -> usize {
        self.topic.broadcast(&Global, Arc::from(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::Connection;

    #[test]
    fn status_is_broadcast_raw() {
        let coord = DoorCoordinator::new();
        let (conn, mut rx) = Connection::channel();
        conn.open().unwrap();
        coord.topic.attach(Global, &conn).unwrap();

        assert_eq!(coord.status_posted("open"), 1);
        assert_eq!(rx.try_recv().unwrap().as_ref(), "open");
    }

    #[test]
    fn no_subscribers_delivers_zero() {
        let coord = DoorCoordinator::new();
        assert_eq!(coord.status_posted("closed"), 0);
    }
}
