//! Metrics collection and exposition.
//!
//! # Metrics
//! - `guard_requests_total` (counter): requests by method, status
//! - `guard_request_duration_seconds` (histogram): latency distribution
//! - `guard_denials_total` (counter): rejections by code, surface
//! - `guard_upstream_errors_total` (counter): failed forwards
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus exporter is optional and bound on its own address

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::policy::Denial;

/// Install the Prometheus exporter. Failures are logged, not fatal.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "guard_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("guard_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_denial(denial: &Denial) {
    let surface = denial.surface.map(|s| s.as_str()).unwrap_or("none");
    metrics::counter!(
        "guard_denials_total",
        "code" => denial.code,
        "surface" => surface
    )
    .increment(1);
}

pub fn record_upstream_error() {
    metrics::counter!("guard_upstream_errors_total").increment(1);
}
