//! WebSocket driver: one task per attached connection, pumping the outbound
//! frame queue to the socket and applying the per-endpoint echo policy to
//! inbound frames.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;

use super::{chat_envelope, json_frame, Connection, TopicKey, TopicRegistry};

/// What to do with a text frame a client sends on an attached socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoPolicy {
    /// Parse JSON and re-broadcast wrapped in the chat envelope
    /// (`{"type":"broadcast","message":...}`). Chat room and feed sockets.
    Envelope,
    /// Parse JSON and re-broadcast as-is. Presence, roster, board and
    /// meeting sockets.
    Verbatim,
    /// Re-broadcast the raw text frame. The door feed.
    RawText,
    /// Inbound frames are dropped. Server-fed sockets (seat map).
    Ignore,
}

impl EchoPolicy {
    /// Turn an inbound text frame into the frame to re-broadcast, or `None`
    /// when the policy swallows it. A JSON parse failure drops only the
    /// offending frame; the connection stays open.
    fn apply(&self, text: &str) -> Result<Option<Arc<str>>, serde_json::Error> {
        match self {
            EchoPolicy::Envelope => {
                let value: Value = serde_json::from_str(text)?;
                Ok(Some(chat_envelope("broadcast", value)))
            }
            EchoPolicy::Verbatim => {
                let value: Value = serde_json::from_str(text)?;
                Ok(Some(json_frame(&value)))
            }
            EchoPolicy::RawText => Ok(Some(Arc::from(text))),
            EchoPolicy::Ignore => Ok(None),
        }
    }
}

/// Attach an upgraded socket to a topic and drive it until the client goes
/// away, then clean up. This is the entire lifecycle of one subscriber.
pub async fn serve_topic<K: TopicKey>(
    socket: WebSocket,
    registry: Arc<TopicRegistry<K>>,
    key: K,
    policy: EchoPolicy,
) {
    let (conn, outbound) = Connection::channel();
    if conn.open().is_err() {
        return;
    }
    if let Err(err) = registry.attach(key.clone(), &conn) {
        tracing::warn!(registry = registry.name(), topic = %key, %err, "refusing attach");
        return;
    }
    tracing::debug!(
        registry = registry.name(),
        topic = %key,
        connection_id = %conn.id(),
        "socket attached"
    );

    let rebroadcast = {
        let registry = registry.clone();
        let key = key.clone();
        move |frame: Arc<str>| registry.broadcast(&key, frame)
    };
    drive(socket, conn.clone(), outbound, policy, rebroadcast).await;

    conn.close();
    registry.remove(&conn);
    tracing::debug!(
        registry = registry.name(),
        topic = %key,
        connection_id = %conn.id(),
        "socket detached"
    );
}

/// Pump loop for one connection: outbound frames to the socket, inbound
/// frames through the echo policy. Returns when the client disconnects, the
/// transport errors, or the connection is closed server-side (its queue
/// sender dropped).
async fn drive<F>(
    socket: WebSocket,
    conn: Arc<Connection>,
    mut outbound: mpsc::UnboundedReceiver<Arc<str>>,
    policy: EchoPolicy,
    rebroadcast: F,
) where
    F: Fn(Arc<str>) -> usize,
{
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            frame = outbound.recv() => {
                match frame {
                    Some(frame) => {
                        if ws_tx.send(Message::Text(frame.as_ref().into())).await.is_err() {
                            tracing::debug!(connection_id = %conn.id(), "socket write failed");
                            break;
                        }
                    }
                    None => break,
                }
            }

            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => match policy.apply(&text) {
                        Ok(Some(frame)) => {
                            rebroadcast(frame);
                        }
                        Ok(None) => {}
                        Err(err) => {
                            // One undecodable frame does not close the socket.
                            tracing::warn!(
                                connection_id = %conn.id(),
                                %err,
                                "dropping undecodable frame"
                            );
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // ping/pong/binary
                    Some(Err(err)) => {
                        tracing::debug!(connection_id = %conn.id(), ?err, "socket read error");
                        break;
                    }
                }
            }
        }
    }
}
