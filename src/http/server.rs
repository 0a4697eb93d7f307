//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with a single catch-all handler
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Turn each request into a `RawRequest` and hand it to the dispatcher
//! - Record request metrics
//! - Serve until the shutdown coordinator fires

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    Router,
};
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ApiConfig;
use crate::dispatch::{Dispatcher, UNMATCHED};
use crate::http::request::RawRequest;
use crate::http::response::ResponseEnvelope;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub max_body_size: usize,
}

/// HTTP front end for the dispatcher.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(dispatcher: Dispatcher, config: &ApiConfig) -> Self {
        let state = AppState {
            dispatcher,
            max_body_size: config.security.max_body_size,
        };
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ApiConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id
                )
            }))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: every request goes through the dispatcher.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let started = Instant::now();
    let method = request.method().clone();

    let raw = match RawRequest::from_parts(request, state.max_body_size).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable request body");
            let envelope = ResponseEnvelope::message(413, "payload too large");
            metrics::record_request(&method, envelope.status, UNMATCHED, started);
            return envelope.into_response();
        }
    };

    // Handlers are synchronous and may hash passwords.
    let dispatcher = state.dispatcher.clone();
    let (envelope, handler) = match tokio::task::spawn_blocking(move || dispatcher.dispatch(&raw)).await {
        Ok(dispatched) => (dispatched.envelope, dispatched.handler),
        Err(e) => {
            tracing::error!(error = %e, "Dispatch task failed");
            (ResponseEnvelope::internal_error(), UNMATCHED)
        }
    };

    tracing::debug!(status = envelope.status, handler, "Request dispatched");
    metrics::record_request(&method, envelope.status, handler, started);
    envelope.into_response()
}
