//! Route registration: root router and nested groups.
//!
//! # Responsibilities
//! - Register routes with their effective middleware chain
//! - Concatenate group prefixes and inherited middleware (outer to inner)
//!
//! # Design Decisions
//! - Chains are captured at registration time; middleware added to a group
//!   afterwards does not reach routes already registered
//! - Registration is fallible and returns `RouteError` instead of panicking

use axum::http::Method;

use crate::chain::{handler_fn, BoxFuture, HandlerFn, MiddlewareFn};
use crate::context::RequestContext;
use crate::error::{DispatchResult, RouteError};
use crate::routing::matcher::Pattern;
use crate::routing::router::{Route, RouteTable};

/// Registration methods shared by [`Router`] and [`Group`].
pub trait Routes {
    /// Register an already boxed `handler` behind `chain`, labelled `name`
    /// in logs and route listings.
    fn add_route(
        &mut self,
        method: Method,
        pattern: &str,
        chain: Vec<MiddlewareFn>,
        handler: HandlerFn,
        name: &'static str,
    ) -> Result<&mut Self, RouteError>;

    /// Register `handler` behind `chain` for `method` and `pattern`.
    fn handle<F>(
        &mut self,
        method: Method,
        pattern: &str,
        chain: Vec<MiddlewareFn>,
        handler: F,
    ) -> Result<&mut Self, RouteError>
    where
        F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, DispatchResult> + Send + Sync + 'static,
    {
        let name = std::any::type_name::<F>();
        self.add_route(method, pattern, chain, handler_fn(handler), name)
    }

    fn get<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RouteError>
    where
        F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, DispatchResult> + Send + Sync + 'static,
    {
        self.handle(Method::GET, pattern, Vec::new(), handler)
    }

    fn post<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RouteError>
    where
        F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, DispatchResult> + Send + Sync + 'static,
    {
        self.handle(Method::POST, pattern, Vec::new(), handler)
    }

    fn put<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RouteError>
    where
        F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, DispatchResult> + Send + Sync + 'static,
    {
        self.handle(Method::PUT, pattern, Vec::new(), handler)
    }

    fn patch<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RouteError>
    where
        F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, DispatchResult> + Send + Sync + 'static,
    {
        self.handle(Method::PATCH, pattern, Vec::new(), handler)
    }

    fn delete<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RouteError>
    where
        F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, DispatchResult> + Send + Sync + 'static,
    {
        self.handle(Method::DELETE, pattern, Vec::new(), handler)
    }
}

fn register(
    table: &mut RouteTable,
    prefix: &Pattern,
    inherited: &[MiddlewareFn],
    method: Method,
    pattern: &str,
    chain: Vec<MiddlewareFn>,
    handler: HandlerFn,
    name: &'static str,
) -> Result<(), RouteError> {
    let pattern = prefix.join(&Pattern::parse(pattern)?)?;
    let mut effective = inherited.to_vec();
    effective.extend(chain);
    table.register(Route::new(method, pattern, effective, handler).with_handler_name(name))
}

/// Root of the route tree.
///
/// Middleware added with [`Router::use_middleware`] applies to routes
/// registered afterwards and to the 404/405 fallback.
#[derive(Default)]
pub struct Router {
    table: RouteTable,
    middleware: Vec<MiddlewareFn>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn use_middleware(&mut self, middleware: MiddlewareFn) -> &mut Self {
        self.middleware.push(middleware);
        self
    }

    /// Open a group under `prefix` that inherits the current root middleware.
    pub fn group(
        &mut self,
        prefix: &str,
        middleware: impl IntoIterator<Item = MiddlewareFn>,
    ) -> Result<Group<'_>, RouteError> {
        let prefix = Pattern::parse(prefix)?;
        let mut inherited = self.middleware.clone();
        inherited.extend(middleware);
        Ok(Group {
            table: &mut self.table,
            prefix,
            middleware: inherited,
        })
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn middleware(&self) -> &[MiddlewareFn] {
        &self.middleware
    }

    pub fn into_parts(self) -> (RouteTable, Vec<MiddlewareFn>) {
        (self.table, self.middleware)
    }
}

impl Routes for Router {
    fn add_route(
        &mut self,
        method: Method,
        pattern: &str,
        chain: Vec<MiddlewareFn>,
        handler: HandlerFn,
        name: &'static str,
    ) -> Result<&mut Self, RouteError> {
        register(
            &mut self.table,
            &Pattern::root(),
            &self.middleware,
            method,
            pattern,
            chain,
            handler,
            name,
        )?;
        Ok(self)
    }
}

/// A prefix plus inherited middleware, borrowed from its parent.
pub struct Group<'r> {
    table: &'r mut RouteTable,
    prefix: Pattern,
    middleware: Vec<MiddlewareFn>,
}

impl Group<'_> {
    pub fn use_middleware(&mut self, middleware: MiddlewareFn) -> &mut Self {
        self.middleware.push(middleware);
        self
    }

    /// Open a nested group; prefixes and middleware concatenate.
    pub fn group(
        &mut self,
        prefix: &str,
        middleware: impl IntoIterator<Item = MiddlewareFn>,
    ) -> Result<Group<'_>, RouteError> {
        let prefix = self.prefix.join(&Pattern::parse(prefix)?)?;
        let mut inherited = self.middleware.clone();
        inherited.extend(middleware);
        Ok(Group {
            table: &mut *self.table,
            prefix,
            middleware: inherited,
        })
    }

    pub fn prefix(&self) -> &Pattern {
        &self.prefix
    }
}

impl Routes for Group<'_> {
    fn add_route(
        &mut self,
        method: Method,
        pattern: &str,
        chain: Vec<MiddlewareFn>,
        handler: HandlerFn,
        name: &'static str,
    ) -> Result<&mut Self, RouteError> {
        register(
            self.table,
            &self.prefix,
            &self.middleware,
            method,
            pattern,
            chain,
            handler,
            name,
        )?;
        Ok(self)
    }
}
