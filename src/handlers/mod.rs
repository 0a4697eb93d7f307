//! Business handlers and the contract they share with the dispatcher.
//!
//! # Data Flow
//! ```text
//! Action Gate
//!     → Endpoint::invoke (fresh handler value per call)
//!     → Handler action fn(&mut H, &Call) -> ActionResult
//!     → Ok(ResponseEnvelope) | Err(HandlerError)
//!     → HandlerError::into_envelope (gate boundary only)
//! ```
//!
//! # Design Decisions
//! - Actions are resolved to typed fn pointers when routes are registered
//! - Each handler type declares a static authenticated-action set
//! - Handlers never build error envelopes themselves; they return errors

pub mod categories;
pub mod counter_offers;
pub mod groups;
pub mod higgles;
pub mod products;
pub mod users;

use std::cell::OnceCell;
use std::sync::Arc;
use thiserror::Error;

use crate::dispatch::params::RequestParams;
use crate::http::response::ResponseEnvelope;
use crate::payments::{PaymentFailure, PaymentGateway, SimulatedGateway};
use crate::store::{MemoryStore, User, UserLookup};

pub use categories::CategoryApi;
pub use counter_offers::CounterOfferApi;
pub use groups::GroupApi;
pub use higgles::HiggleApi;
pub use products::ProductApi;
pub use users::UserApi;

/// Outcome of one action.
pub type ActionResult = Result<ResponseEnvelope, HandlerError>;

/// A handler action resolved at registration time.
pub type Action<H> = fn(&mut H, &Call<'_>) -> ActionResult;

/// A handler type.
///
/// A new value is created with `Default` for every call, so any state a
/// handler keeps lives for one request only.
pub trait Handler: Default + 'static {
    /// Name used in logs and route listings.
    const NAME: &'static str;

    /// Actions that need a resolved user.
    const AUTHENTICATED_ACTIONS: &'static [&'static str] = &[];

    /// Resolve an action identifier.
    fn action(id: &str) -> Option<Action<Self>>;

    fn requires_authentication(action: &str) -> bool {
        Self::AUTHENTICATED_ACTIONS.contains(&action)
    }
}

/// Failures an action can signal.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A looked-up record does not exist, or no user is signed in.
    #[error("resource not found")]
    ResourceNotFound,

    /// A required field is missing.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Payment(#[from] PaymentFailure),

    #[error("render failed: {0}")]
    Render(#[from] serde_json::Error),
}

impl HandlerError {
    /// Convert to the envelope sent to the client.
    pub fn into_envelope(self) -> ResponseEnvelope {
        match self {
            HandlerError::ResourceNotFound => ResponseEnvelope::resource_not_found(),
            // 501 rather than 4xx is what existing clients expect here.
            HandlerError::Validation(_) | HandlerError::Render(_) => ResponseEnvelope::internal_error(),
            HandlerError::Payment(PaymentFailure::Declined(_)) => {
                ResponseEnvelope::message(403, crate::http::response::INTERNAL_SERVER_ERROR)
            }
            HandlerError::Payment(PaymentFailure::Rejected(errors)) => {
                ResponseEnvelope::json(403, &serde_json::json!({ "errors": errors }))
                    .unwrap_or_else(|_| ResponseEnvelope::internal_error())
            }
        }
    }
}

/// Helper for `Option` lookups that should read as a resource miss.
pub trait OrNotFound<T> {
    fn or_not_found(self) -> Result<T, HandlerError>;
}

impl<T> OrNotFound<T> for Option<T> {
    fn or_not_found(self) -> Result<T, HandlerError> {
        self.ok_or(HandlerError::ResourceNotFound)
    }
}

/// Collaborators available to every call.
#[derive(Clone)]
pub struct Services {
    pub users: Arc<dyn UserLookup>,
    pub store: Arc<MemoryStore>,
    pub payments: Arc<dyn PaymentGateway>,
}

impl Services {
    /// The store doubles as the user lookup.
    pub fn new(store: Arc<MemoryStore>, payments: Arc<dyn PaymentGateway>) -> Self {
        Self {
            users: store.clone(),
            store,
            payments,
        }
    }

    /// Empty store with the simulated gateway.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(SimulatedGateway))
    }
}

/// Per-call context: parameters, collaborators and the memoized user.
pub struct Call<'a> {
    params: RequestParams,
    token_param: &'a str,
    services: &'a Services,
    current_user: OnceCell<Option<User>>,
}

impl<'a> Call<'a> {
    pub fn new(params: RequestParams, token_param: &'a str, services: &'a Services) -> Self {
        Self {
            params,
            token_param,
            services,
            current_user: OnceCell::new(),
        }
    }

    pub fn params(&self) -> &RequestParams {
        &self.params
    }

    pub fn store(&self) -> &MemoryStore {
        &self.services.store
    }

    pub fn payments(&self) -> &dyn PaymentGateway {
        self.services.payments.as_ref()
    }

    /// The auth token, if non-blank.
    pub fn token(&self) -> Option<&str> {
        self.params.present(self.token_param)
    }

    /// User owning the auth token. Looked up at most once per call.
    pub fn current_user(&self) -> Option<&User> {
        self.current_user
            .get_or_init(|| {
                let token = self.token()?;
                self.services.users.find_by_token(token)
            })
            .as_ref()
    }

    /// The current user, or a resource miss.
    pub fn require_user(&self) -> Result<&User, HandlerError> {
        self.current_user().or_not_found()
    }
}

/// The canonical substitute for actions the caller may not run.
pub fn not_found(_call: &Call<'_>) -> ActionResult {
    Err(HandlerError::ResourceNotFound)
}

/// Slice `rows` to the requested page.
pub fn paginate<T>(rows: Vec<T>, params: &RequestParams) -> Vec<T> {
    let per_page = params.per_page();
    rows.into_iter()
        .skip((params.page() - 1).saturating_mul(per_page))
        .take(per_page)
        .collect()
}

/// Parse a decimal money string ("19.99", "100") into cents.
pub fn parse_cents(value: &str) -> Option<u64> {
    let value = value.trim();
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let cents: u64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<u64>().ok()? * 10,
        2 => fraction.parse().ok()?,
        _ => return None,
    };
    whole.checked_mul(100)?.checked_add(cents)
}
