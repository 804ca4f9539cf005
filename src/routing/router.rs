//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled routes in a segment trie
//! - Resolve (method, path) to a route plus parameter bindings
//! - Distinguish "no such path" from "path exists under another method"
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Static beats dynamic at each position: literal, then `:param`, then `*catch-all`
//! - Backtracking: a literal branch that dead-ends falls back to the parameter branch
//! - Parameter names live on the route, so `/me/:id` and `/me/:key` share a node

use std::collections::{BTreeMap, HashMap};

use axum::http::Method;

use crate::chain::{HandlerFn, MiddlewareFn};
use crate::context::PathParams;
use crate::error::RouteError;
use crate::routing::matcher::{Pattern, Segment};

/// A registered route: pattern, effective middleware chain and handler.
pub struct Route {
    method: Method,
    pattern: Pattern,
    path: String,
    chain: Vec<MiddlewareFn>,
    handler: HandlerFn,
    handler_name: &'static str,
}

impl Route {
    pub fn new(method: Method, pattern: Pattern, chain: Vec<MiddlewareFn>, handler: HandlerFn) -> Self {
        let path = pattern.to_string();
        Self {
            method,
            pattern,
            path,
            chain,
            handler,
            handler_name: "anonymous",
        }
    }

    /// Label the handler for logs and route listings.
    pub fn with_handler_name(mut self, name: &'static str) -> Self {
        self.handler_name = name;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Pattern rendered as a path template, e.g. `/me/:id`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn chain(&self) -> &[MiddlewareFn] {
        &self.chain
    }

    pub fn handler(&self) -> &HandlerFn {
        &self.handler
    }

    pub fn handler_name(&self) -> &'static str {
        self.handler_name
    }

    fn bind(&self, values: Vec<String>) -> PathParams {
        self.pattern
            .bindings()
            .map(str::to_string)
            .zip(values)
            .collect()
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("middleware", &self.chain.len())
            .field("handler", &self.handler_name)
            .finish()
    }
}

/// Result of a successful lookup.
#[derive(Debug)]
pub struct Match<'t> {
    pub route: &'t Route,
    pub params: PathParams,
}

#[derive(Default)]
struct Node {
    literals: HashMap<String, Node>,
    param: Option<Box<Node>>,
    catch_all: Option<Box<Node>>,
    routes: BTreeMap<String, Route>,
}

impl Node {
    fn find<'n>(
        &'n self,
        segments: &[&str],
        method: &Method,
        captured: &mut Vec<String>,
    ) -> Option<&'n Route> {
        let Some((first, rest)) = segments.split_first() else {
            return self.routes.get(method.as_str());
        };

        if let Some(child) = self.literals.get(*first) {
            if let Some(route) = child.find(rest, method, captured) {
                return Some(route);
            }
        }

        if let Some(child) = &self.param {
            captured.push(first.to_string());
            if let Some(route) = child.find(rest, method, captured) {
                return Some(route);
            }
            captured.pop();
        }

        if let Some(child) = &self.catch_all {
            if let Some(route) = child.routes.get(method.as_str()) {
                captured.push(segments.join("/"));
                return Some(route);
            }
        }

        None
    }

    /// Methods registered on any node that matches `segments`.
    fn collect_methods(&self, segments: &[&str], out: &mut Vec<Method>) {
        let Some((first, rest)) = segments.split_first() else {
            out.extend(self.routes.values().map(|r| r.method.clone()));
            return;
        };
        if let Some(child) = self.literals.get(*first) {
            child.collect_methods(rest, out);
        }
        if let Some(child) = &self.param {
            child.collect_methods(rest, out);
        }
        if let Some(child) = &self.catch_all {
            out.extend(child.routes.values().map(|r| r.method.clone()));
        }
    }

    fn collect_routes<'n>(&'n self, out: &mut Vec<&'n Route>) {
        out.extend(self.routes.values());
        for child in self.literals.values() {
            child.collect_routes(out);
        }
        if let Some(child) = &self.param {
            child.collect_routes(out);
        }
        if let Some(child) = &self.catch_all {
            child.collect_routes(out);
        }
    }
}

/// Compiled route table.
#[derive(Default)]
pub struct RouteTable {
    root: Node,
    len: usize,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a route. Fails without modifying the table if the same
    /// (method, pattern shape) is already present.
    pub fn register(&mut self, route: Route) -> Result<(), RouteError> {
        let mut node = &mut self.root;
        for segment in route.pattern.segments() {
            node = match segment {
                Segment::Literal(literal) => node.literals.entry(literal.clone()).or_default(),
                Segment::Param(_) => node.param.get_or_insert_with(Box::default).as_mut(),
                Segment::CatchAll(_) => node.catch_all.get_or_insert_with(Box::default).as_mut(),
            };
        }

        let key = route.method.as_str().to_string();
        if node.routes.contains_key(&key) {
            return Err(RouteError::DuplicateRoute {
                method: route.method.clone(),
                pattern: route.path.clone(),
            });
        }

        tracing::debug!(
            method = %route.method,
            path = %route.path,
            handlers = route.chain.len() + 1,
            handler = route.handler_name,
            "Route registered"
        );
        node.routes.insert(key, route);
        self.len += 1;
        Ok(())
    }

    /// Resolve a concrete request path.
    pub fn resolve(&self, method: &Method, path: &str) -> Result<Match<'_>, RouteError> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let mut captured = Vec::new();
        if let Some(route) = self.root.find(&segments, method, &mut captured) {
            return Ok(Match {
                route,
                params: route.bind(captured),
            });
        }

        let mut allowed = Vec::new();
        self.root.collect_methods(&segments, &mut allowed);
        if allowed.is_empty() {
            return Err(RouteError::NotFound {
                path: path.to_string(),
            });
        }

        allowed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        allowed.dedup();
        Err(RouteError::MethodNotAllowed {
            method: method.clone(),
            path: path.to_string(),
            allowed,
        })
    }

    /// All routes, ordered by path then method.
    pub fn routes(&self) -> Vec<&Route> {
        let mut routes = Vec::with_capacity(self.len);
        self.root.collect_routes(&mut routes);
        routes.sort_by(|a, b| {
            a.path
                .cmp(&b.path)
                .then_with(|| a.method.as_str().cmp(b.method.as_str()))
        });
        routes
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
