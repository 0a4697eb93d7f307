//! Route and endpoint bindings.
//!
//! # Responsibilities
//! - Bind an HTTP method and compiled pattern to one handler action
//! - Resolve the action to a typed function at registration time
//! - Record whether the action sits behind the authentication gate

use axum::http::Method;
use std::fmt;
use std::sync::Arc;

use crate::handlers::{ActionResult, Call, Handler};
use crate::routing::pattern::CompiledPattern;
use crate::routing::RouterError;

type Invoke = dyn Fn(&Call<'_>) -> ActionResult + Send + Sync;

fn erase<F>(f: F) -> Arc<Invoke>
where
    F: Fn(&Call<'_>) -> ActionResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A handler type paired with one of its actions.
///
/// Invoking an endpoint builds a fresh handler value for that call only.
#[derive(Clone)]
pub struct Endpoint {
    handler: &'static str,
    action: String,
    authenticated: bool,
    invoke: Arc<Invoke>,
}

impl Endpoint {
    /// Resolve `action` on handler type `H`.
    pub fn of<H: Handler>(action: &str) -> Result<Self, RouterError> {
        let function = H::action(action).ok_or_else(|| RouterError::UnknownAction {
            handler: H::NAME,
            action: action.to_string(),
        })?;

        Ok(Self {
            handler: H::NAME,
            action: action.to_string(),
            authenticated: H::requires_authentication(action),
            invoke: erase(move |call| {
                let mut handler = H::default();
                function(&mut handler, call)
            }),
        })
    }

    /// Handler type name.
    pub fn handler(&self) -> &'static str {
        self.handler
    }

    /// Action identifier.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Whether the action is in the handler's authenticated set.
    pub fn requires_authentication(&self) -> bool {
        self.authenticated
    }

    /// Run the action on a fresh handler instance.
    pub fn invoke(&self, call: &Call<'_>) -> ActionResult {
        (self.invoke)(call)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("handler", &self.handler)
            .field("action", &self.action)
            .field("authenticated", &self.authenticated)
            .finish()
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.handler == other.handler
            && self.action == other.action
            && self.authenticated == other.authenticated
    }
}

impl Eq for Endpoint {}

/// One registered (method, pattern, handler, action) binding.
///
/// Immutable once created; equality is structural.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    method: Method,
    pattern: CompiledPattern,
    endpoint: Endpoint,
}

impl Route {
    pub(crate) fn new(method: Method, pattern: CompiledPattern, endpoint: Endpoint) -> Self {
        Self {
            method,
            pattern,
            endpoint,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Path parameters for a path this route matched.
    pub fn path_params<'p>(&self, path: &'p str) -> Vec<(&str, &'p str)> {
        self.pattern.extract(path).unwrap_or_default()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<7} {:<34} {}#{}",
            self.method.as_str(),
            self.pattern.template(),
            self.endpoint.handler,
            self.endpoint.action
        )?;
        if self.endpoint.authenticated {
            write!(f, " [auth]")?;
        }
        Ok(())
    }
}
