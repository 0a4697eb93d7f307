//! Metrics collection and exposition.
//!
//! # Metrics
//! - `higgler_requests_total` (counter): requests by method, status, handler
//! - `higgler_request_duration_seconds` (histogram): latency by method, handler
//!
//! # Design Decisions
//! - Recorded by the HTTP transport, never by the dispatch core
//! - Without an installed recorder the macros are no-ops
//! - Methods outside the routed set share one `other` label

use axum::http::Method;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

pub const REQUESTS_TOTAL: &str = "higgler_requests_total";
pub const REQUEST_DURATION: &str = "higgler_request_duration_seconds";

/// Install the Prometheus recorder with a scrape listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Label value for a request method.
pub fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        _ => "other",
    }
}

/// Record one finished request.
pub fn record_request(method: &Method, status: u16, handler: &str, started: Instant) {
    let method = method_label(method);
    ::metrics::counter!(
        REQUESTS_TOTAL,
        "method" => method,
        "status" => status.to_string(),
        "handler" => handler.to_string()
    )
    .increment(1);
    ::metrics::histogram!(
        REQUEST_DURATION,
        "method" => method,
        "handler" => handler.to_string()
    )
    .record(started.elapsed().as_secs_f64());
}
