//! Request dispatch.
//!
//! # Data Flow
//! ```text
//! Request<Bytes>                       (or reject(request, err))
//!     → RequestContext::from_request
//!     → RouteTable::resolve
//!         Ok    → route chain ++ handler
//!         Err   → root middleware ++ fallback (404 / 405)
//!     → catch_unwind per link (panic → Internal, outer links complete)
//!     → catch_unwind boundary here as the last resort (→ 500)
//!     → Response<Bytes>
//! ```
//!
//! # Design Decisions
//! - The route table is frozen when the dispatcher is built
//! - Errors returned by the chain are rendered here, by status class
//! - A panicking handler fails only its own request

use std::panic::AssertUnwindSafe;
use std::time::Instant;

use axum::body::Bytes;
use axum::http::{header, HeaderValue, Request, Response};
use futures_util::FutureExt;

use crate::chain::{handler_fn, panic_message, run_chain, MiddlewareFn};
use crate::context::RequestContext;
use crate::error::{DispatchError, DispatchResult};
use crate::observability::metrics;
use crate::routing::{RouteTable, Router};

/// Top-level entry point: resolves and runs one request at a time.
pub struct Dispatcher {
    table: RouteTable,
    middleware: Vec<MiddlewareFn>,
}

impl Dispatcher {
    pub fn new(router: Router) -> Self {
        let (table, middleware) = router.into_parts();
        tracing::info!(routes = table.len(), "Dispatcher ready");
        Self { table, middleware }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Dispatch one buffered request and return the finished response.
    pub async fn handle(&self, request: Request<Bytes>) -> Response<Bytes> {
        self.dispatch(request, None).await
    }

    /// Answer `request` with `err` without resolving a route.
    ///
    /// Used for failures found before dispatch (body limit, unreadable body);
    /// the root middleware still wraps the response.
    pub async fn reject(&self, request: Request<Bytes>, err: DispatchError) -> Response<Bytes> {
        self.dispatch(request, Some(err)).await
    }

    async fn dispatch(&self, request: Request<Bytes>, rejection: Option<DispatchError>) -> Response<Bytes> {
        let start = Instant::now();
        let mut ctx = RequestContext::from_request(request);

        let outcome = AssertUnwindSafe(self.run(&mut ctx, rejection))
            .catch_unwind()
            .await;
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                if err.status_code().is_server_error() {
                    tracing::error!(
                        method = %ctx.method(),
                        path = %ctx.path(),
                        error = %err,
                        "Request failed"
                    );
                }
                write_error(&mut ctx, &err);
            }
            Err(panic) => {
                tracing::error!(
                    method = %ctx.method(),
                    path = %ctx.path(),
                    route = ctx.route().unwrap_or(metrics::UNMATCHED_ROUTE),
                    panic = %panic_message(panic.as_ref()),
                    "Dispatch panicked; recovered"
                );
                write_error(&mut ctx, &DispatchError::Internal("dispatch panicked".into()));
            }
        }

        metrics::record_request(
            ctx.method().as_str(),
            ctx.response().status().as_u16(),
            ctx.route().unwrap_or(metrics::UNMATCHED_ROUTE),
            start,
        );
        ctx.into_response()
    }

    async fn run(&self, ctx: &mut RequestContext, rejection: Option<DispatchError>) -> DispatchResult {
        let err = match rejection {
            Some(err) => err,
            None => match self.table.resolve(ctx.method(), ctx.path()) {
                Ok(found) => {
                    ctx.bind_route(found.route.path(), found.params);
                    return run_chain(found.route.chain(), found.route.handler(), ctx).await;
                }
                Err(err) => {
                    tracing::debug!(error = %err, "No route resolved");
                    DispatchError::from(err)
                }
            },
        };
        let fallback = handler_fn(move |_ctx| {
            let result: DispatchResult = Err(err.clone());
            Box::pin(async move { result })
        });
        run_chain(&self.middleware, &fallback, ctx).await
    }
}

/// Replace whatever was written with the error's JSON body.
fn write_error(ctx: &mut RequestContext, err: &DispatchError) {
    ctx.response_mut().clear();
    if let DispatchError::MethodNotAllowed { allowed } = err {
        let allow = allowed
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        if let Ok(value) = HeaderValue::from_str(&allow) {
            ctx.response_mut().insert_header(header::ALLOW, value);
        }
    }
    if ctx.json(err.status_code(), &err.body()).is_err() {
        ctx.response_mut().set_status(err.status_code());
    }
}
