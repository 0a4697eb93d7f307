//! Higgler API: routing and dispatch core for the group-buying backend.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (axum, middleware)
//!                         │
//!                         ▼
//!                     http::request::RawRequest
//!                         │
//!                         ▼
//!                     dispatch::Dispatcher ──▶ routing::Router::lookup
//!                         │                        (first registered match)
//!                         ▼
//!                     dispatch::ActionGate ──▶ handlers::* (fresh per call)
//!                         │                        │
//!                         │                        ├─ store::MemoryStore
//!                         │                        └─ payments::PaymentGateway
//!                         ▼
//!     Client Response ◀── http::response::ResponseEnvelope
//! ```

// Core
pub mod dispatch;
pub mod handlers;
pub mod routes;
pub mod routing;

// Collaborators
pub mod payments;
pub mod store;

// Transport and cross-cutting concerns
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::ApiConfig;
pub use dispatch::Dispatcher;
pub use http::{HttpServer, RawRequest, ResponseEnvelope};
pub use lifecycle::Shutdown;
pub use routing::Router;
