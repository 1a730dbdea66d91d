//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address, read behaviour).
    pub listener: ListenerConfig,

    /// Connection worker pool.
    pub pool: PoolConfig,

    /// Response cache.
    pub cache: CacheConfig,

    /// Static file serving.
    pub static_files: StaticFilesConfig,

    /// View templates.
    pub templates: TemplateConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Size of the single read buffer per connection.
    pub read_buffer_bytes: usize,

    /// Seconds to wait for request bytes before closing; 0 waits forever.
    pub read_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            read_buffer_bytes: 8192,
            read_timeout_secs: 30,
        }
    }
}

/// What the accept loop does when the connection queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueueFullPolicy {
    /// Wait for queue space before accepting more connections.
    #[default]
    Block,
    /// Answer `503 Service Unavailable` and close.
    Reject,
}

/// Worker pool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of connection workers.
    pub workers: usize,

    /// Accepted connections waiting for a worker.
    pub queue_capacity: usize,

    /// Behaviour when the queue is full.
    pub when_full: QueueFullPolicy,

    /// How long shutdown waits for in-flight connections before aborting
    /// the workers still serving them.
    pub drain_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get() * 2)
            .unwrap_or(8);
        Self {
            workers,
            queue_capacity: 1024,
            when_full: QueueFullPolicy::Block,
            drain_timeout_secs: 5,
        }
    }
}

/// Response cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable caching of GET responses.
    pub enabled: bool,

    /// Maximum number of cached paths.
    pub capacity: usize,

    /// Largest encoded response that may be cached.
    pub max_entry_bytes: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 256,
            max_entry_bytes: 32 * 1024,
        }
    }
}

/// Static file configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory to serve files from; disabled when unset.
    pub root: Option<String>,
}

/// View template configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory holding view templates.
    pub root: String,

    /// Template file extension, without the dot.
    pub extension: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            root: "views".to_string(),
            extension: "blade".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:8080");
        assert_eq!(config.cache.max_entry_bytes, 32768);
        assert_eq!(config.pool.when_full, QueueFullPolicy::Block);
        assert_eq!(config.pool.drain_timeout_secs, 5);
        assert!(config.static_files.root.is_none());
        assert_eq!(config.templates.extension, "blade");
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            [pool]
            workers = 2
            when_full = "reject"

            [static_files]
            root = "public"
            "#,
        )
        .unwrap();

        assert_eq!(config.pool.workers, 2);
        assert_eq!(config.pool.queue_capacity, 1024);
        assert_eq!(config.pool.when_full, QueueFullPolicy::Reject);
        assert_eq!(config.static_files.root.as_deref(), Some("public"));
        assert!(config.cache.enabled);
    }
}
