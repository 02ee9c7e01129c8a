//! Metrics collection and exposition.
//!
//! # Metrics
//! - `catalog_proxy_requests_total` (counter): requests by method, status,
//!   route
//! - `catalog_proxy_request_duration_seconds` (histogram): latency
//!   distribution with the same labels
//!
//! # Design Decisions
//! - Route labels are the fixed pipeline labels, never raw paths, to keep
//!   cardinality bounded

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listen address.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => {
            describe_counter!(
                "catalog_proxy_requests_total",
                "Total requests served, by method, status and route"
            );
            describe_histogram!(
                "catalog_proxy_request_duration_seconds",
                "Request latency in seconds, by method, status and route"
            );
            tracing::info!(address = %addr, "metrics exporter listening");
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to install metrics exporter");
        }
    }
}

/// Record one served request. Called on every response, error paths
/// included.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("route", route.to_string()),
    ];
    counter!("catalog_proxy_requests_total", &labels).increment(1);
    histogram!("catalog_proxy_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}
