//! Per-handler action gate.
//!
//! # Responsibilities
//! - Enforce the handler type's authenticated-action set
//! - Substitute the canonical not-found action when no user resolves
//! - Convert handler errors to envelopes at a single boundary
//!
//! # Design Decisions
//! - The current user is resolved once per call and cached on the `Call`
//! - No logging and no retries at this layer

use crate::dispatch::params::RequestParams;
use crate::handlers::{self, ActionResult, Call, HandlerError, Services};
use crate::http::response::ResponseEnvelope;
use crate::routing::Endpoint;

/// Which action a call ends up running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The action the route names.
    Requested,
    /// The not-found substitute.
    NotFound,
}

/// Gate in front of every handler invocation.
#[derive(Clone, Copy)]
pub struct ActionGate<'a> {
    services: &'a Services,
    token_param: &'a str,
}

impl<'a> ActionGate<'a> {
    pub fn new(services: &'a Services, token_param: &'a str) -> Self {
        Self {
            services,
            token_param,
        }
    }

    /// Run `endpoint` with `params` and always produce an envelope.
    pub fn dispatch(&self, endpoint: &Endpoint, params: RequestParams) -> ResponseEnvelope {
        let call = Call::new(params, self.token_param, self.services);
        self.run(endpoint, &call)
            .unwrap_or_else(HandlerError::into_envelope)
    }

    fn run(&self, endpoint: &Endpoint, call: &Call<'_>) -> ActionResult {
        match Self::resolve(endpoint, call) {
            Resolution::Requested => endpoint.invoke(call),
            Resolution::NotFound => handlers::not_found(call),
        }
    }

    /// Decide between the requested action and the not-found substitute.
    pub fn resolve(endpoint: &Endpoint, call: &Call<'_>) -> Resolution {
        if !endpoint.requires_authentication() {
            return Resolution::Requested;
        }
        if call.token().is_none() || call.current_user().is_none() {
            return Resolution::NotFound;
        }
        Resolution::Requested
    }
}
