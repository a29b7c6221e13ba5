//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Install the Prometheus exporter and describe gateway metrics
//! - Record per-request outcomes and latency
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by outcome and route
//! - `gateway_request_duration_seconds` (histogram): latency by outcome
//! - `gateway_upstream_errors_total` (counter): failed upstream requests
//!
//! # Design Decisions
//! - Metric updates are atomic increments, cheap enough for the hot path
//! - `outcome` is one of redirect, forward, upstream_error
//! - `route` is login, logout or profile for redirects, none otherwise

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
///
/// A failure to install is logged and leaves the gateway running
/// without metrics exposition.
pub fn init_metrics(address: SocketAddr) {
    match PrometheusBuilder::new()
        .with_http_listener(address)
        .install()
    {
        Ok(()) => {
            describe_counter!(
                "gateway_requests_total",
                "Total requests handled, by outcome and route"
            );
            describe_histogram!(
                "gateway_request_duration_seconds",
                "Request handling latency in seconds, by outcome"
            );
            describe_counter!(
                "gateway_upstream_errors_total",
                "Requests that failed against the upstream server"
            );
            tracing::info!(%address, "Metrics exporter listening");
        }
        Err(e) => {
            tracing::error!("Failed to install metrics exporter: {}", e);
        }
    }
}

/// Record a completed request.
pub fn record_request(outcome: &'static str, route: &'static str, start: Instant) {
    counter!("gateway_requests_total", "outcome" => outcome, "route" => route).increment(1);
    histogram!("gateway_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record a failed upstream request.
pub fn record_upstream_error() {
    counter!("gateway_upstream_errors_total").increment(1);
}
