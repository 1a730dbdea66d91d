//! Route table and lookup.
//!
//! # Responsibilities
//! - Store compiled routes in registration order
//! - Resolve a path to the first matching route plus its parameter values
//!
//! # Design Decisions
//! - Immutable after `build()` (shared across workers without locks)
//! - O(n) scan; the first registered match wins, there is no specificity
//!   ranking
//! - Matching is by path only; the method decides the argument shape

use std::fmt;
use std::sync::Arc;

use crate::error::ServeError;
use crate::http::{Method, Responder};
use crate::routing::dispatch::{Handler, HandlerArgs, HandlerError};
use crate::routing::pattern::PathPattern;

/// A registered route.
pub struct RouteDefinition {
    pub pattern: PathPattern,
    pub method: Method,
    pub expects_request: bool,
    pub handler: Handler,
}

impl fmt::Debug for RouteDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDefinition")
            .field("pattern", &self.pattern.as_str())
            .field("method", &self.method)
            .field("expects_request", &self.expects_request)
            .finish_non_exhaustive()
    }
}

/// A resolved route plus the parameter values taken from the path.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a RouteDefinition,
    pub params: Vec<String>,
}

/// Immutable, ordered set of routes.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<RouteDefinition>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Find the first route whose pattern matches the whole path.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.routes.iter().find_map(|route| {
            route
                .pattern
                .captures(path)
                .map(|params| RouteMatch { route, params })
        })
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn routes(&self) -> impl Iterator<Item = &RouteDefinition> {
        self.routes.iter()
    }
}

/// Builder collecting routes in priority order.
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    routes: Vec<RouteDefinition>,
}

impl RouteTableBuilder {
    /// Register a GET route. The handler receives only path parameters.
    pub fn get<F, R>(self, pattern: &str, handler: F) -> Result<Self, ServeError>
    where
        F: Fn(HandlerArgs) -> Result<R, HandlerError> + Send + Sync + 'static,
        R: Responder + 'static,
    {
        self.route(Method::Get, pattern, false, handler)
    }

    /// Register a POST route. The handler receives the request as well.
    pub fn post<F, R>(self, pattern: &str, handler: F) -> Result<Self, ServeError>
    where
        F: Fn(HandlerArgs) -> Result<R, HandlerError> + Send + Sync + 'static,
        R: Responder + 'static,
    {
        self.route(Method::Post, pattern, true, handler)
    }

    /// Register a route, compiling its pattern now.
    pub fn route<F, R>(
        mut self,
        method: Method,
        pattern: &str,
        expects_request: bool,
        handler: F,
    ) -> Result<Self, ServeError>
    where
        F: Fn(HandlerArgs) -> Result<R, HandlerError> + Send + Sync + 'static,
        R: Responder + 'static,
    {
        let pattern = PathPattern::compile(pattern)?;
        tracing::debug!(
            pattern = pattern.as_str(),
            method = %method,
            parameters = ?pattern.parameter_names(),
            "Route registered"
        );

        let handler: Handler = Arc::new(move |args| {
            handler(args).map(|r| Box::new(r) as Box<dyn Responder>)
        });

        self.routes.push(RouteDefinition {
            pattern,
            method,
            expects_request,
            handler,
        });
        Ok(self)
    }

    pub fn build(self) -> RouteTable {
        RouteTable {
            routes: self.routes,
        }
    }
}
