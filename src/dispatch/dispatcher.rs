//! Request dispatcher.
//!
//! # Responsibilities
//! - Look the request up in the route registry
//! - Resolve the auth token (header, then Basic credentials) for matched routes
//! - Layer the parameter sources and hand off to the Action Gate
//!
//! # Design Decisions
//! - Parameter precedence: query/body < path placeholders < auth token
//! - A miss never reaches a handler or the credential check; it yields the
//!   route-not-found envelope
//! - The registry is shared read-only; dispatch never mutates it

use std::sync::Arc;

use crate::config::AuthConfig;
use crate::dispatch::auth;
use crate::dispatch::gate::ActionGate;
use crate::dispatch::params::RequestParams;
use crate::handlers::Services;
use crate::http::request::RawRequest;
use crate::http::response::ResponseEnvelope;
use crate::routing::Router;

/// Handler label used when no route matched.
pub const UNMATCHED: &str = "none";

/// Result of one dispatch, with the handler that served it.
#[derive(Debug)]
pub struct Dispatched {
    pub envelope: ResponseEnvelope,
    pub handler: &'static str,
}

/// Entry point from the transport into routing and handlers.
#[derive(Clone)]
pub struct Dispatcher {
    router: Arc<Router>,
    services: Services,
    auth: AuthConfig,
}

impl Dispatcher {
    pub fn new(router: Arc<Router>, services: Services, auth: AuthConfig) -> Self {
        Self {
            router,
            services,
            auth,
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Dispatch and return the envelope only.
    pub fn handle(&self, request: &RawRequest) -> ResponseEnvelope {
        self.dispatch(request).envelope
    }

    /// Dispatch one request. Always produces an envelope.
    pub fn dispatch(&self, request: &RawRequest) -> Dispatched {
        let Some(route) = self.router.lookup(&request.method, &request.path) else {
            tracing::debug!(method = %request.method, path = %request.path, "No route matched");
            return Dispatched {
                envelope: ResponseEnvelope::route_not_found(),
                handler: UNMATCHED,
            };
        };

        let endpoint = route.endpoint();
        tracing::trace!(
            method = %request.method,
            path = %request.path,
            handler = endpoint.handler(),
            action = endpoint.action(),
            "Route matched"
        );

        let token = auth::resolve_token(&request.headers, &self.auth, self.services.users.as_ref());
        let mut params: RequestParams = request
            .params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        params.merge(route.path_params(&request.path));
        params.insert(&self.auth.token_param, token.unwrap_or_default());

        let envelope = ActionGate::new(&self.services, &self.auth.token_param).dispatch(endpoint, params);
        Dispatched {
            envelope,
            handler: endpoint.handler(),
        }
    }
}
