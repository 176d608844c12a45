//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, route, status
//! - `gateway_request_duration_seconds` (histogram): latency by route
//! - `gateway_upstream_requests_total` (counter): upstream calls by upstream, outcome
//! - `gateway_upstream_duration_seconds` (histogram): upstream latency
//! - `gateway_rate_limited_total` (counter): requests rejected by the rate limiter
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - Route label is the matched route template, never the raw path

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one completed inbound request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("gateway_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record one upstream call.
pub fn record_upstream(upstream: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "gateway_upstream_requests_total",
        "upstream" => upstream,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("gateway_upstream_duration_seconds", "upstream" => upstream)
        .record(start.elapsed().as_secs_f64());
}

/// Record a request rejected by the rate limiter.
pub fn record_rate_limited() {
    metrics::counter!("gateway_rate_limited_total").increment(1);
}

/// Middleware recording count and latency of every request it wraps.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
