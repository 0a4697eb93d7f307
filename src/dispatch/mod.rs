//! Dispatch core: from a transport request to a response envelope.
//!
//! # Data Flow
//! ```text
//! RawRequest
//!     → auth.rs (token from header or Basic credentials)
//!     → routing::Router::lookup (first registered match)
//!     → params.rs (query/body, then path, then token)
//!     → gate.rs (authenticated-action check, fresh handler, error envelope)
//!     → ResponseEnvelope
//! ```
//!
//! # Design Decisions
//! - Every request produces exactly one envelope; nothing here panics
//! - The dispatcher is `Clone` and shares the registry behind an `Arc`

pub mod auth;
pub mod dispatcher;
pub mod gate;
pub mod params;

pub use dispatcher::{Dispatched, Dispatcher, UNMATCHED};
pub use gate::{ActionGate, Resolution};
pub use params::RequestParams;
