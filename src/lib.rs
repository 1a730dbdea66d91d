//! burrow: a minimal embedded HTTP/1.1 server.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ net::Listener ──▶ net::WorkerPool ──▶ http::server (worker)
//!                                                        │
//!                                                        ▼
//!                                                  http::pipeline
//!                                       ┌────────────┼──────────────┐
//!                                       ▼            ▼              ▼
//!                                     cache        files     routing (table,
//!                                                               dispatch)
//!                                                        │
//!   Client ◀───────────── http::response (encode) ◀──────┘
//!
//!   Cross-cutting: config, observability, lifecycle, error, templates
//! ```

// Core engine
pub mod cache;
pub mod files;
pub mod http;
pub mod net;
pub mod routing;

// Application surface
pub mod demo;
pub mod templates;

// Cross-cutting concerns
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;

pub use config::ServerConfig;
pub use error::ServeError;
pub use http::{Engine, HttpServer};
pub use lifecycle::Shutdown;
pub use routing::RouteTable;
