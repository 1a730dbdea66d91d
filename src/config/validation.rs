//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (sizes > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::ServerConfig;

/// Smallest read buffer that can hold a minimal request line.
const MIN_READ_BUFFER: usize = 16;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut fail = |field: &'static str, message: String| {
        errors.push(ValidationError { field, message });
    };

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        fail(
            "listener.bind_address",
            format!("{:?} is not a socket address", config.listener.bind_address),
        );
    }
    if config.listener.read_buffer_bytes < MIN_READ_BUFFER {
        fail(
            "listener.read_buffer_bytes",
            format!("must be at least {MIN_READ_BUFFER}"),
        );
    }
    if config.pool.workers == 0 {
        fail("pool.workers", "must be greater than 0".to_string());
    }
    if config.pool.queue_capacity == 0 {
        fail("pool.queue_capacity", "must be greater than 0".to_string());
    }
    if config.cache.enabled && config.cache.capacity == 0 {
        fail("cache.capacity", "must be greater than 0 when caching is enabled".to_string());
    }
    if let Some(root) = &config.static_files.root {
        if root.trim().is_empty() {
            fail("static_files.root", "must not be empty".to_string());
        }
    }
    if config.templates.extension.is_empty() || config.templates.extension.starts_with('.') {
        fail(
            "templates.extension",
            "must be a non-empty extension without a leading dot".to_string(),
        );
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        fail(
            "observability.metrics_address",
            format!("{:?} is not a socket address", config.observability.metrics_address),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
