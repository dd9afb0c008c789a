//! Metrics collection and exposition.
//!
//! # Metrics
//! - `forwarder_requests_total` (counter): requests by method, status, branch
//! - `forwarder_request_duration_seconds` (histogram): latency by branch

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Which path through the interceptor a request took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Preflight,
    Proxy,
    Passthrough,
}

impl Branch {
    pub fn as_str(self) -> &'static str {
        match self {
            Branch::Preflight => "preflight",
            Branch::Proxy => "proxy",
            Branch::Passthrough => "passthrough",
        }
    }
}

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished request.
pub fn record_request(method: &str, status: u16, branch: Branch, start: Instant) {
    counter!(
        "forwarder_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "branch" => branch.as_str()
    )
    .increment(1);
    histogram!("forwarder_request_duration_seconds", "branch" => branch.as_str())
        .record(start.elapsed().as_secs_f64());
}
