//! Middleware chain execution.
//!
//! # Data Flow
//! ```text
//! [m1, m2, ..., mn] + handler
//!     → m1(ctx, next)
//!         → next.run(ctx) → m2(ctx, next) → ... → handler(ctx)
//!         ← Result flows back out through every link that continued
//! ```
//!
//! # Design Decisions
//! - `Next` is consumed by `run`, so a link can continue at most once
//! - A link short-circuits by returning without calling `run`
//! - Once the context is aborted, any later `run` is a no-op
//! - A panic inside a link surfaces as `Internal` to the links around it,
//!   so outer middleware (access log, metrics) still completes
//! - Bare functions and configured closures share one `MiddlewareFn` type

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;

use futures_util::FutureExt;

use crate::context::RequestContext;
use crate::error::{DispatchError, DispatchResult};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Terminal handler for a route.
pub type HandlerFn =
    Arc<dyn for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, DispatchResult> + Send + Sync>;

/// A single link in a middleware chain.
pub type MiddlewareFn = Arc<
    dyn for<'a> Fn(&'a mut RequestContext, Next<'a>) -> BoxFuture<'a, DispatchResult>
        + Send
        + Sync,
>;

/// Wrap a function or closure as middleware.
///
/// # Example
/// ```rust,ignore
/// fn add_header<'a>(ctx: &'a mut RequestContext, next: Next<'a>) -> BoxFuture<'a, DispatchResult> {
///     Box::pin(async move {
///         ctx.set_header("Key", "Val")?;
///         next.run(ctx).await
///     })
/// }
/// let mw = from_fn(add_header);
/// ```
pub fn from_fn<F>(f: F) -> MiddlewareFn
where
    F: for<'a> Fn(&'a mut RequestContext, Next<'a>) -> BoxFuture<'a, DispatchResult>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

/// Wrap a function or closure as a terminal handler.
pub fn handler_fn<F>(f: F) -> HandlerFn
where
    F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, DispatchResult>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

/// The remainder of a chain, handed to each middleware.
pub struct Next<'a> {
    chain: &'a [MiddlewareFn],
    handler: &'a HandlerFn,
}

impl<'a> Next<'a> {
    pub fn new(chain: &'a [MiddlewareFn], handler: &'a HandlerFn) -> Self {
        Self { chain, handler }
    }

    /// Continue with the next link, or the handler once the chain is exhausted.
    pub fn run<'c>(self, ctx: &'c mut RequestContext) -> BoxFuture<'c, DispatchResult>
    where
        'a: 'c,
    {
        Box::pin(async move {
            if ctx.is_aborted() {
                return Ok(());
            }
            let link = async {
                match self.chain.split_first() {
                    Some((middleware, rest)) => {
                        let next = Next {
                            chain: rest,
                            handler: self.handler,
                        };
                        middleware(&mut *ctx, next).await
                    }
                    None => (self.handler)(&mut *ctx).await,
                }
            };
            let outcome = AssertUnwindSafe(link).catch_unwind().await;
            match outcome {
                Ok(result) => result,
                Err(panic) => {
                    tracing::error!(
                        method = %ctx.method(),
                        path = %ctx.path(),
                        route = ctx.route().unwrap_or("-"),
                        panic = %panic_message(panic.as_ref()),
                        "Handler panicked; recovered"
                    );
                    Err(DispatchError::Internal("handler panicked".into()))
                }
            }
        })
    }

    /// Links still to run, not counting the handler.
    pub fn remaining(&self) -> usize {
        self.chain.len()
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic payload"
    }
}

/// Run `chain` followed by `handler` against `ctx`.
pub async fn run_chain(
    chain: &[MiddlewareFn],
    handler: &HandlerFn,
    ctx: &mut RequestContext,
) -> DispatchResult {
    Next::new(chain, handler).run(ctx).await
}
