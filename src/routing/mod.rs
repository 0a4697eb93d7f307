//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route registration (at startup):
//!     (method, template, handler, action)[]
//!     → pattern.rs (compile template into anchored regex + key list)
//!     → route.rs (resolve action to a typed endpoint)
//!     → router.rs (append per method, freeze as immutable Router)
//!
//! Incoming request (method, path)
//!     → router.rs (scan method's routes in registration order)
//!     → Return: first matching Route or None
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Full-string matches only; templates ending in `/` match as prefixes
//! - Deterministic: first registered match wins

pub mod pattern;
pub mod route;
pub mod router;

use thiserror::Error;

pub use pattern::CompiledPattern;
pub use route::{Endpoint, Route};
pub use router::{Router, RouterBuilder};

/// Errors raised while building the route table.
#[derive(Debug, Error)]
pub enum RouterError {
    /// The template did not compile to a valid regex.
    #[error("invalid route template {template:?}: {source}")]
    InvalidPattern {
        template: String,
        #[source]
        source: regex::Error,
    },

    /// The handler type has no action with this identifier.
    #[error("{handler} has no action {action:?}")]
    UnknownAction {
        handler: &'static str,
        action: String,
    },
}
