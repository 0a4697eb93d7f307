//! Route registry and lookup.
//!
//! # Responsibilities
//! - Store compiled routes per HTTP method, in registration order
//! - Look up the first route whose pattern matches a path
//! - Return an explicit no-match rather than a default route
//!
//! # Design Decisions
//! - Built once through [`RouterBuilder`], immutable afterwards
//! - Shared across requests behind an `Arc` without locks
//! - O(n) scan per method; first registered match wins

use axum::http::Method;
use std::collections::HashMap;

use crate::handlers::Handler;
use crate::routing::pattern::CompiledPattern;
use crate::routing::route::{Endpoint, Route};
use crate::routing::RouterError;

/// Immutable route table.
#[derive(Debug, Default)]
pub struct Router {
    routes: HashMap<Method, Vec<Route>>,
    order: Vec<(Method, usize)>,
}

impl Router {
    /// Start a new registration phase.
    pub fn builder() -> RouterBuilder {
        RouterBuilder::default()
    }

    /// First route registered under `method` whose pattern matches `path`.
    pub fn lookup(&self, method: &Method, path: &str) -> Option<&Route> {
        self.routes
            .get(method)?
            .iter()
            .find(|route| route.pattern().is_match(path))
    }

    /// All routes in global registration order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.order
            .iter()
            .filter_map(|(method, index)| self.routes.get(method)?.get(*index))
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Mutable registration surface for a [`Router`].
#[derive(Debug, Default)]
pub struct RouterBuilder {
    router: Router,
}

impl RouterBuilder {
    /// Compile `template` and append it to `method`'s route list.
    pub fn register<H: Handler>(
        &mut self,
        method: Method,
        template: &str,
        action: &str,
    ) -> Result<&mut Self, RouterError> {
        let pattern = CompiledPattern::compile(template)?;
        let endpoint = Endpoint::of::<H>(action)?;

        let list = self.router.routes.entry(method.clone()).or_default();
        self.router.order.push((method.clone(), list.len()));
        list.push(Route::new(method, pattern, endpoint));
        Ok(self)
    }

    pub fn get<H: Handler>(&mut self, template: &str, action: &str) -> Result<&mut Self, RouterError> {
        self.register::<H>(Method::GET, template, action)
    }

    pub fn post<H: Handler>(&mut self, template: &str, action: &str) -> Result<&mut Self, RouterError> {
        self.register::<H>(Method::POST, template, action)
    }

    pub fn put<H: Handler>(&mut self, template: &str, action: &str) -> Result<&mut Self, RouterError> {
        self.register::<H>(Method::PUT, template, action)
    }

    pub fn delete<H: Handler>(&mut self, template: &str, action: &str) -> Result<&mut Self, RouterError> {
        self.register::<H>(Method::DELETE, template, action)
    }

    /// Freeze the table.
    pub fn build(self) -> Router {
        tracing::debug!(routes = self.router.len(), "Route table built");
        self.router
    }
}
