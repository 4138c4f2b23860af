//! In-memory realtime core: connection lifecycle, per-topic registries, and
//! the WebSocket driver loop. No persistence — everything here is
//! process-local state for currently-attached clients.

pub mod connection;
pub mod registry;
pub mod socket;

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

pub use connection::Connection;
pub use registry::{Global, TopicKey, TopicRegistry};

/// Attach-time failures. Delivery failures never surface here — they are
/// handled per-subscriber inside the registry.
#[derive(Debug, Error)]
pub enum RealtimeError {
    #[error("connection {0} is not in a state that can be attached")]
    InvalidConnectionState(String),
}

/// Per-subscriber delivery failure. Logged and converted into a detach; never
/// propagated to the publisher.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("connection {0} is not open")]
    NotOpen(String),
    #[error("outbound queue for connection {0} is closed")]
    QueueClosed(String),
}

/// Serialize a JSON value into a shared wire frame.
pub fn json_frame(value: &Value) -> Arc<str> {
    Arc::from(value.to_string().as_str())
}

/// The `{"type": ..., "message": ...}` envelope used on all chat sockets.
pub fn chat_envelope(kind: &str, message: Value) -> Arc<str> {
    json_frame(&serde_json::json!({ "type": kind, "message": message }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_envelope_wraps_message() {
        let frame = chat_envelope("broadcast", serde_json::json!({"content": "hi"}));
        let value: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["type"], "broadcast");
        assert_eq!(value["message"]["content"], "hi");
    }
}
