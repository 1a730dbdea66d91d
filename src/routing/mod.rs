//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route registration (at startup):
//!     builder.get / builder.post / builder.route
//!     → pattern.rs (compile `{name}` placeholders once)
//!     → table.rs (append in registration order)
//!     → build() freezes an immutable RouteTable
//!
//! Incoming path:
//!     → table.rs (first full match, parameter values)
//!     → dispatch.rs (build arguments, invoke, coerce result)
//!     → ResponseValue or ServeError
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - First match wins (registration order)
//! - Explicit builder instead of discovering handlers at runtime

pub mod dispatch;
pub mod pattern;
pub mod table;

pub use dispatch::{invoke, Handler, HandlerArgs, HandlerError, HandlerResult};
pub use pattern::PathPattern;
pub use table::{RouteDefinition, RouteMatch, RouteTable, RouteTableBuilder};
