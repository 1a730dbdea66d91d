//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → CLI overrides applied by the binary
//!     → handed by value to the components that need it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; nothing is set through global state
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    CacheConfig, ListenerConfig, ObservabilityConfig, PoolConfig, QueueFullPolicy, ServerConfig,
    StaticFilesConfig, TemplateConfig,
};
pub use validation::{validate_config, ValidationError};
