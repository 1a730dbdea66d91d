//! Metrics collection and exposition.
//!
//! # Metrics
//! - `burrow_requests_total` (counter): responses by method, status, outcome
//! - `burrow_request_duration_seconds` (histogram): read-to-write latency
//! - `burrow_cache_hits_total` (counter): responses served from the cache
//! - `burrow_cache_entries` (gauge): current cache size
//! - `burrow_connections_rejected_total` (counter): refused by a full queue

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed response.
pub fn record_request(method: &str, status: u16, outcome: &'static str, start: Instant) {
    counter!(
        "burrow_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!("burrow_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_cache_hit() {
    counter!("burrow_cache_hits_total").increment(1);
}

pub fn record_cache_size(entries: usize) {
    gauge!("burrow_cache_entries").set(entries as f64);
}

pub fn record_connection_rejected() {
    counter!("burrow_connections_rejected_total").increment(1);
}
