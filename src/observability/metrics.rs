//! Metrics collection and exposition.
//!
//! # Metrics
//! - `upstream_requests_total` (counter): outbound calls by status
//! - `upstream_request_duration_seconds` (histogram): outbound latency
//!
//! Recording is a no-op until [`init_metrics`] installs a recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Status label used when no response was received.
pub const STATUS_ERROR: &str = "error";

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one outbound call.
pub fn record_upstream(status: &str, start: Instant) {
    metrics::counter!("upstream_requests_total", "status" => status.to_string()).increment(1);
    metrics::histogram!("upstream_request_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}
