//! Pending-stream table
//!
//! A request whose body arrives in a later DATA frame is parked here between
//! its HEADERS frame and that DATA frame. Entries are keyed by connection
//! and then by stream id; the table is shared by all connection threads.

use crate::http::Request;
use dashmap::DashMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stream ID type
pub type StreamId = u32;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Handle identifying one accepted connection
///
/// Assigned at accept time and never reused within a process, unlike a
/// peer address, which the OS can hand out again after a reconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Allocate a fresh connection id
    pub fn next() -> Self {
        ConnectionId(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Requests awaiting their body, per connection and stream
///
/// Operations on one connection's entries never observe another
/// connection's updates: each connection's streams live under their own
/// shard-locked key.
#[derive(Debug, Default)]
pub struct StreamTable {
    pending: DashMap<ConnectionId, HashMap<StreamId, Request>>,
}

impl StreamTable {
    /// Create an empty table
    pub fn new() -> Self {
        StreamTable::default()
    }

    /// Park `request` on `stream_id`, returning any request it replaces
    pub fn put(&self, conn: ConnectionId, stream_id: StreamId, request: Request) -> Option<Request> {
        self.pending
            .entry(conn)
            .or_default()
            .insert(stream_id, request)
    }

    /// Copy of the request parked on `stream_id`, if any
    pub fn get(&self, conn: ConnectionId, stream_id: StreamId) -> Option<Request> {
        self.pending.get(&conn)?.get(&stream_id).cloned()
    }

    /// Whether a request is parked on `stream_id`
    pub fn contains(&self, conn: ConnectionId, stream_id: StreamId) -> bool {
        self.pending
            .get(&conn)
            .is_some_and(|streams| streams.contains_key(&stream_id))
    }

    /// Remove and return the request parked on `stream_id`
    pub fn remove(&self, conn: ConnectionId, stream_id: StreamId) -> Option<Request> {
        let removed = self.pending.get_mut(&conn)?.remove(&stream_id);
        self.pending.remove_if(&conn, |_, streams| streams.is_empty());
        removed
    }

    /// Drop every entry belonging to `conn`, returning how many there were
    pub fn purge(&self, conn: ConnectionId) -> usize {
        self.pending
            .remove(&conn)
            .map(|(_, streams)| streams.len())
            .unwrap_or(0)
    }

    /// Number of requests parked for `conn`
    pub fn pending_count(&self, conn: ConnectionId) -> usize {
        self.pending.get(&conn).map(|streams| streams.len()).unwrap_or(0)
    }

    /// Number of connections with at least one parked request
    pub fn connection_count(&self) -> usize {
        self.pending.len()
    }
}
