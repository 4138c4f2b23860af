//! Generic topic registry: topic key -> currently-attached connections.
//!
//! One instance exists per domain feed (chat rooms, per-user feeds, the
//! fixed global topics). Uses `DashMap` for shard-level concurrency; the
//! shard lock is only ever held for map bookkeeping and the snapshot step of
//! a broadcast, never across a send.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;

use super::{Connection, RealtimeError};

/// Anything a registry can be keyed by: numeric room/meeting ids, user id
/// strings, or [`Global`] for single-topic feeds.
pub trait TopicKey: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static {}

impl<T> TopicKey for T where T: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static {}

/// The key of a fixed, well-known single-topic feed (door status, seat map,
/// presence, the roster feeds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Global;

impl fmt::Display for Global {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("global")
    }
}

/// Connections currently subscribed to each topic, plus a reverse index so a
/// closing connection can be stripped from every entry it appears in.
///
/// Membership is by `Arc` pointer identity; a connection appears at most once
/// per topic, so a broadcast never delivers the same frame twice to one
/// subscriber. Entries whose subscriber list becomes empty are removed, so
/// the registry does not grow with the historical key space.
pub struct TopicRegistry<K: TopicKey> {
    name: &'static str,
    topics: DashMap<K, Vec<Arc<Connection>>>,
    members: DashMap<String, Vec<K>>,
}

impl<K: TopicKey> TopicRegistry<K> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            topics: DashMap::new(),
            members: DashMap::new(),
        }
    }

    /// Registry name used in log fields.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Register a connection under a topic key. Idempotent for a connection
    /// already attached to that key. Fails only when the handle is already
    /// closed — including a close that races the attach, which is undone
    /// before returning.
    pub fn attach(&self, key: K, conn: &Arc<Connection>) -> Result<(), RealtimeError> {
        if conn.is_closed() {
            return Err(RealtimeError::InvalidConnectionState(conn.id().to_string()));
        }

        {
            let mut entry = self.topics.entry(key.clone()).or_default();
            if !entry.iter().any(|c| Arc::ptr_eq(c, conn)) {
                entry.push(conn.clone());
            }
        }
        {
            let mut keys = self.members.entry(conn.id().to_string()).or_default();
            if !keys.contains(&key) {
                keys.push(key.clone());
            }
        }

        // A close that lands between the state check and the inserts would
        // leave a stale entry behind; re-check and undo.
        if conn.is_closed() {
            self.detach(&key, conn);
            return Err(RealtimeError::InvalidConnectionState(conn.id().to_string()));
        }
        Ok(())
    }

    /// Remove a connection from one topic. A no-op when the connection was
    /// not attached — disconnect races are expected and tolerated.
    pub fn detach(&self, key: &K, conn: &Arc<Connection>) {
        self.detach_from_topic(key, conn);
        let now_empty = match self.members.get_mut(conn.id()) {
            Some(mut keys) => {
                keys.retain(|k| k != key);
                keys.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.members.remove_if(conn.id(), |_, keys| keys.is_empty());
        }
    }

    /// Strip a connection from every topic it is attached to. Used on close
    /// and after a failed delivery. Returns the number of topics it was
    /// removed from.
    pub fn remove(&self, conn: &Arc<Connection>) -> usize {
        let keys = match self.members.remove(conn.id()) {
            Some((_, keys)) => keys,
            None => return 0,
        };
        for key in &keys {
            self.detach_from_topic(key, conn);
        }
        keys.len()
    }

    /// Deliver a frame to every connection currently attached to the topic.
    /// The subscriber list is snapshotted under the shard lock and the lock
    /// released before any delivery, so attach/detach during a broadcast
    /// cannot corrupt iteration. A failing subscriber is closed and removed;
    /// the rest of the fan-out continues. Returns the delivered count —
    /// unknown or empty topics deliver 0.
    pub fn broadcast(&self, key: &K, frame: Arc<str>) -> usize {
        let snapshot: Vec<Arc<Connection>> = match self.topics.get(key) {
            Some(entry) => entry.clone(),
            None => return 0,
        };

        let mut delivered = 0;
        let mut failed = Vec::new();
        for conn in snapshot {
            match conn.send(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(err) => {
                    tracing::warn!(
                        registry = self.name,
                        topic = %key,
                        connection_id = %conn.id(),
                        %err,
                        "dropping subscriber after failed delivery"
                    );
                    failed.push(conn);
                }
            }
        }
        for conn in failed {
            conn.close();
            self.remove(&conn);
        }
        delivered
    }

    /// Number of connections currently attached to the topic. Unknown keys
    /// count 0 — looking one up is never an error.
    pub fn subscriber_count(&self, key: &K) -> usize {
        self.topics.get(key).map(|entry| entry.len()).unwrap_or(0)
    }

    /// Number of topics that currently have at least one subscriber.
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    fn detach_from_topic(&self, key: &K, conn: &Arc<Connection>) {
        let now_empty = match self.topics.get_mut(key) {
            Some(mut entry) => {
                entry.retain(|c| !Arc::ptr_eq(c, conn));
                entry.is_empty()
            }
            None => return,
        };
        if now_empty {
            self.topics.remove_if(key, |_, conns| conns.is_empty());
        }
    }
}
