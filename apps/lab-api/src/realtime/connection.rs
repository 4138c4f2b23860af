//! Per-socket connection handle and lifecycle state machine.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use labdesk_common::id;

use super::{DeliveryError, RealtimeError};

const PENDING: u8 = 0;
const OPEN: u8 = 1;
const CLOSED: u8 = 2;

/// One live client connection: a `conn_`-prefixed id, the sending half of the
/// outbound frame queue, and the lifecycle state.
///
/// Lifecycle is `PENDING -> OPEN -> CLOSED`. `CLOSED` is terminal; `close` is
/// idempotent so rapid disconnect/error races collapse into a single cleanup.
/// The receiving half of the queue is owned by the socket driver task, which
/// performs the actual network writes — delivery through [`Connection::send`]
/// is just an enqueue and never blocks on I/O.
pub struct Connection {
    id: String,
    tx: mpsc::UnboundedSender<Arc<str>>,
    state: AtomicU8,
}

impl Connection {
    /// Create a new connection in the `PENDING` state together with the
    /// receiving half of its outbound queue.
    pub fn channel() -> (Arc<Self>, mpsc::UnboundedReceiver<Arc<str>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = Arc::new(Self {
            id: id::prefixed_ulid(id::prefix::CONNECTION),
            tx,
            state: AtomicU8::new(PENDING),
        });
        (conn, rx)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Transition `PENDING -> OPEN` once the transport handshake completed.
    pub fn open(&self) -> Result<(), RealtimeError> {
        self.state
            .compare_exchange(PENDING, OPEN, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| RealtimeError::InvalidConnectionState(self.id.clone()))
    }

    pub fn is_open(&self) -> bool {
        self.state.load(Ordering::Acquire) == OPEN
    }

    pub fn is_closed(&self) -> bool {
        self.state.load(Ordering::Acquire) == CLOSED
    }

    /// Enqueue a frame for delivery. Fails when the connection is not open or
    /// its driver task has already gone away.
    pub fn send(&self, frame: Arc<str>) -> Result<(), DeliveryError> {
        if !self.is_open() {
            return Err(DeliveryError::NotOpen(self.id.clone()));
        }
        self.tx
            .send(frame)
            .map_err(|_| DeliveryError::QueueClosed(self.id.clone()))
    }

    /// Transition to `CLOSED`. Returns `true` only for the transition that
    /// actually closed the connection, so cleanup runs exactly once.
    pub fn close(&self) -> bool {
        self.state.swap(CLOSED, Ordering::AcqRel) != CLOSED
    }
}
