//! Property tests for route resolution and chain execution.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{Method, Request, StatusCode};
use proptest::prelude::*;
use route_chain::chain::{from_fn, handler_fn, run_chain, HandlerFn, MiddlewareFn};
use route_chain::routing::{Pattern, Route, RouteTable};
use route_chain::{RequestContext, RouteError};

fn noop_handler() -> HandlerFn {
    handler_fn(|ctx| Box::pin(async move { ctx.json(StatusCode::OK, "ok") }))
}

fn route(method: Method, pattern: &str) -> Route {
    Route::new(method, Pattern::parse(pattern).unwrap(), Vec::new(), noop_handler())
}

fn segment() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z0-9._~!$&'()+,;=@-]{1,16}").unwrap()
}

proptest! {
    /// A named parameter binds the exact segment text.
    #[test]
    fn proptest_param_binds_exact_segment(id in segment(), key in segment()) {
        let mut table = RouteTable::new();
        table.register(route(Method::GET, "/me/:id")).unwrap();
        table.register(route(Method::GET, "/pair/:a/:b")).unwrap();

        let found = table.resolve(&Method::GET, &format!("/me/{}", id)).unwrap();
        prop_assert_eq!(found.params.get("id"), Some(id.as_str()));
        prop_assert_eq!(found.params.len(), 1);

        let found = table.resolve(&Method::GET, &format!("/pair/{}/{}", id, key)).unwrap();
        prop_assert_eq!(found.params.get("a"), Some(id.as_str()));
        prop_assert_eq!(found.params.get("b"), Some(key.as_str()));
    }

    /// Literal segments win over parameters at the same position.
    #[test]
    fn proptest_static_beats_dynamic(id in segment()) {
        let mut table = RouteTable::new();
        table.register(route(Method::GET, "/users/:id")).unwrap();
        table.register(route(Method::GET, "/users/me")).unwrap();

        let found = table.resolve(&Method::GET, "/users/me").unwrap();
        prop_assert_eq!(found.route.path(), "/users/me");
        prop_assert!(found.params.is_empty());

        let found = table.resolve(&Method::GET, &format!("/users/{}", id)).unwrap();
        if id == "me" {
            prop_assert_eq!(found.route.path(), "/users/me");
        } else {
            prop_assert_eq!(found.route.path(), "/users/:id");
        }
    }

    /// Duplicate registration fails and leaves the table unchanged.
    #[test]
    fn proptest_duplicate_rejected(parts in prop::collection::vec(segment(), 1..4)) {
        let pattern = format!("/{}", parts.join("/"));
        let mut table = RouteTable::new();
        table.register(route(Method::POST, &pattern)).unwrap();

        let err = table.register(route(Method::POST, &pattern)).unwrap_err();
        let is_duplicate = matches!(err, RouteError::DuplicateRoute { .. });
        prop_assert!(is_duplicate);
        prop_assert_eq!(table.len(), 1);
        prop_assert!(table.resolve(&Method::POST, &pattern).is_ok());
    }

    /// Short-circuiting at link k runs links 1..=k only and skips the handler.
    #[test]
    fn proptest_short_circuit_prefix(n in 1usize..8, k in 0usize..8) {
        let ran = Arc::new(AtomicUsize::new(0));
        let handled = Arc::new(AtomicUsize::new(0));
        let abort_at = k.min(n - 1);

        let chain: Vec<MiddlewareFn> = (0..n)
            .map(|i| {
                let ran = ran.clone();
                from_fn(move |ctx, next| {
                    ran.fetch_add(1, Ordering::SeqCst);
                    Box::pin(async move {
                        if i == abort_at {
                            ctx.abort_with_status(StatusCode::FORBIDDEN);
                            Ok(())
                        } else {
                            next.run(ctx).await
                        }
                    })
                })
            })
            .collect();
        let handler = {
            let handled = handled.clone();
            handler_fn(move |ctx| {
                handled.fetch_add(1, Ordering::SeqCst);
                Box::pin(async move { ctx.json(StatusCode::OK, "done") })
            })
        };

        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let mut ctx = RequestContext::from_request(
            Request::builder().uri("/").body(Bytes::new()).unwrap(),
        );
        runtime.block_on(run_chain(&chain, &handler, &mut ctx)).unwrap();

        prop_assert_eq!(ran.load(Ordering::SeqCst), abort_at + 1);
        prop_assert_eq!(handled.load(Ordering::SeqCst), 0);
        prop_assert_eq!(ctx.response().status(), StatusCode::FORBIDDEN);
    }
}
