//! Metrics collection and exposition.
//!
//! # Metrics
//! - `api_requests_total` (counter): requests by method, path, status
//! - `api_request_duration_seconds` (histogram): latency by method, path, status
//! - `upstream_requests_total` (counter): outbound calls by upstream, outcome
//! - `upstream_request_duration_seconds` (histogram): outbound latency
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one served request.
pub fn record_request(method: &str, path: &str, status: u16, started: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];
    ::metrics::counter!("api_requests_total", &labels).increment(1);
    ::metrics::histogram!("api_request_duration_seconds", &labels)
        .record(started.elapsed().as_secs_f64());
}

/// Record one outbound call (`entries` or `rpc`).
pub fn record_upstream(upstream: &'static str, outcome: &'static str, started: Instant) {
    ::metrics::counter!(
        "upstream_requests_total",
        "upstream" => upstream,
        "outcome" => outcome
    )
    .increment(1);
    ::metrics::histogram!("upstream_request_duration_seconds", "upstream" => upstream)
        .record(started.elapsed().as_secs_f64());
}

/// Middleware recording every request under its route template.
///
/// Unmatched paths are grouped under `unmatched` to keep label cardinality bounded.
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&method, &path, response.status().as_u16(), started);
    response
}
