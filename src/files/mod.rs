//! Static file subsystem.
//!
//! # Data Flow
//! ```text
//! request path
//!     → resolver.rs (strip leading '/', join onto root, confine to root)
//!     → mime.rs (content type from extension)
//!     → ResponseValue
//! ```
//!
//! # Design Decisions
//! - Root canonicalised once at construction
//! - Paths resolving outside the root are rejected, never read
//! - Directories are not served

pub mod mime;
pub mod resolver;

pub use mime::content_type_for;
pub use resolver::StaticFileResolver;
