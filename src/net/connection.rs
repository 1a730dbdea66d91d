//! Connection state machine and lifecycle tracking.
//!
//! # Responsibilities
//! - Name the states a connection passes through
//! - Generate unique connection IDs for tracing
//! - Count in-flight connections so shutdown can drain them

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::http::Status;

/// Global atomic counter for connection IDs.
/// Relaxed ordering suffices: only uniqueness is needed.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// States of a single request/response exchange.
///
/// ```text
/// Accepted → Reading → Parsed → {CacheHit | StaticServed | Dispatching | Rejected}
///          → Responded → Closed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Accepted,
    Reading,
    Parsed,
    /// Served from the response cache.
    CacheHit,
    /// Served from the static file root.
    StaticServed,
    /// Served by a route handler.
    Dispatching,
    /// Answered with an error status.
    Rejected(Status),
    Responded,
    Closed,
}

impl ConnectionState {
    /// Short label used for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Accepted => "accepted",
            ConnectionState::Reading => "reading",
            ConnectionState::Parsed => "parsed",
            ConnectionState::CacheHit => "cache_hit",
            ConnectionState::StaticServed => "static",
            ConnectionState::Dispatching => "dispatch",
            ConnectionState::Rejected(_) => "rejected",
            ConnectionState::Responded => "responded",
            ConnectionState::Closed => "closed",
        }
    }

    /// Status code the state answers with, once a response is decided.
    pub fn status(&self) -> Option<Status> {
        match self {
            ConnectionState::CacheHit
            | ConnectionState::StaticServed
            | ConnectionState::Dispatching => Some(Status::Ok),
            ConnectionState::Rejected(status) => Some(*status),
            _ => None,
        }
    }
}

/// Tracks active connections for graceful shutdown.
#[derive(Debug, Clone, Default)]
pub struct ConnectionTracker {
    active_count: Arc<AtomicU64>,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new connection. Returns a guard that decrements on drop.
    pub fn track(&self) -> ConnectionGuard {
        self.active_count.fetch_add(1, Ordering::SeqCst);
        let id = ConnectionId::new();
        tracing::trace!(connection_id = %id, state = ConnectionState::Accepted.label(), "Connection tracked");
        ConnectionGuard {
            active_count: Arc::clone(&self.active_count),
            id,
        }
    }

    pub fn active_count(&self) -> u64 {
        self.active_count.load(Ordering::SeqCst)
    }

    /// Wait until every tracked connection has closed, or the deadline passes.
    /// Returns whether the drain completed.
    pub async fn wait_for_drain(&self, deadline: Duration) -> bool {
        let poll = async {
            while self.active_count() > 0 {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        };
        tokio::time::timeout(deadline, poll).await.is_ok()
    }
}

/// Guard that tracks a connection's lifetime.
/// Decrements the active count when dropped.
#[derive(Debug)]
pub struct ConnectionGuard {
    active_count: Arc<AtomicU64>,
    id: ConnectionId,
}

impl ConnectionGuard {
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.active_count.fetch_sub(1, Ordering::SeqCst);
        tracing::trace!(connection_id = %self.id, state = ConnectionState::Closed.label(), "Connection closed");
    }
}
