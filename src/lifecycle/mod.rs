//! Process lifecycle.
//!
//! # Data Flow
//! ```text
//! Ctrl+C (signals.rs) → Shutdown::trigger (shutdown.rs)
//!     → accept loop stops → queued connections drain → workers joined
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::wait_for_ctrl_c;
