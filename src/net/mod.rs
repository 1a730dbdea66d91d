//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind, accept loop)
//!     → connection.rs (connection ID, tracking guard)
//!     → pool.rs (bounded queue → fixed set of workers)
//!     → Hand off to the HTTP connection worker
//!
//! Connection States:
//!     Accepted → Reading → Parsed → {CacheHit | StaticServed | Dispatching | Rejected}
//!              → Responded → Closed
//! ```
//!
//! # Design Decisions
//! - Bounded queue prevents resource exhaustion; a full queue either blocks
//!   the accept loop or rejects the connection
//! - Each connection tracked so shutdown can drain in-flight work

pub mod connection;
pub mod listener;
pub mod pool;

pub use connection::{ConnectionGuard, ConnectionId, ConnectionState, ConnectionTracker};
pub use listener::Listener;
pub use pool::WorkerPool;
