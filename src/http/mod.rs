//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, catch-all handler)
//!     → request.rs (RawRequest: method, path, headers, params)
//!     → dispatch::Dispatcher
//!     → response.rs (ResponseEnvelope → axum Response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RawRequest, RequestError};
pub use response::ResponseEnvelope;
pub use server::{AppState, HttpServer, X_REQUEST_ID};
