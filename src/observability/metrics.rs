//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by group, status
//! - `gateway_request_duration_seconds` (histogram): latency by group
//! - `gateway_collaborator_faults_total` (counter): faults by group, operation
//! - `gateway_component_health` (gauge): 1=reported, 0=unavailable
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::StatusCode;
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routing::RouteGroup;

/// Label used for routes outside any group (the aggregate health route).
pub const GATEWAY_LABEL: &str = "gateway";

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished request.
pub fn record_request(group: &'static str, status: StatusCode, start: Instant) {
    ::metrics::counter!(
        "gateway_requests_total",
        "group" => group,
        "status" => status.as_u16().to_string()
    )
    .increment(1);
    ::metrics::histogram!("gateway_request_duration_seconds", "group" => group)
        .record(start.elapsed().as_secs_f64());
}

/// Record a collaborator fault, whether or not the handler isolated it.
pub fn record_collaborator_fault(group: RouteGroup, operation: &'static str) {
    ::metrics::counter!(
        "gateway_collaborator_faults_total",
        "group" => group.as_str(),
        "operation" => operation
    )
    .increment(1);
}

/// Record the outcome of a health probe.
pub fn record_component_health(group: RouteGroup, reported: bool) {
    ::metrics::gauge!("gateway_component_health", "component" => group.as_str())
        .set(if reported { 1.0 } else { 0.0 });
}
