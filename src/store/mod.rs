//! Persistence collaborators.
//!
//! # Data Flow
//! ```text
//! Dispatcher ──(Basic credentials)──▶ UserLookup::find_by_email_and_password
//! Action Gate ──(auth token)────────▶ UserLookup::find_by_token
//! Handlers ─────────────────────────▶ MemoryStore tables
//! ```
//!
//! # Design Decisions
//! - The router core only sees the narrow `UserLookup` trait
//! - Records are cloned out; no guard escapes a store call

pub mod memory;
pub mod models;
pub mod seed;

use thiserror::Error;

pub use memory::{MemoryStore, NewUser};
pub use models::User;

/// Resolves the acting user for the authentication gate.
pub trait UserLookup: Send + Sync {
    /// User whose stored token equals `token`.
    fn find_by_token(&self, token: &str) -> Option<User>;

    /// User with this email, only if `password` verifies.
    fn find_by_email_and_password(&self, email: &str, password: &str) -> Option<User>;
}

/// Errors raised by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("seed file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("seed parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
