//! Metrics collection and exposition.
//!
//! # Metrics
//! - `faceswap_requests_total` (counter): requests by method, route, status
//! - `faceswap_request_duration_seconds` (histogram): latency by route
//! - `faceswap_provider_outcomes_total` (counter): provider calls by outcome
//!
//! # Design Decisions
//! - Route label is the matched route template, never the raw path
//! - The Prometheus exporter is opt-in; recording without it is a no-op

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

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

/// Record a completed request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    metrics::counter!(
        "faceswap_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "faceswap_request_duration_seconds",
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record the outcome label of one provider call.
pub fn record_provider_outcome(outcome: &'static str) {
    metrics::counter!("faceswap_provider_outcomes_total", "outcome" => outcome).increment(1);
}

/// Middleware recording count and latency for every routed request.
pub async fn track_requests(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
