//! Demo application: route registration for the public and admin endpoints.
//!
//! # Routes
//! ```text
//! GET    /getData                  token gate → Key: Val → data
//! GET    /getData1, /getData2      data
//! GET    /ping                     pong
//! GET    /me/:id                   user id echo
//! POST   /me  PUT /me  PATCH /me   validated body echo
//! DELETE /me/:key                  deletion ack
//! GET    /get-QryStr               query echo
//! GET    /get-UrlParams/:name/:age path echo
//! GET    /admin/...                basic auth (see admin module)
//! ```
//!
//! The access log wraps every route and the 404/405 fallback.

pub mod handlers;

use axum::http::{HeaderName, Method, StatusCode};

use crate::admin;
use crate::chain::from_fn;
use crate::config::{AppConfig, AuthConfig};
use crate::error::RouteError;
use crate::observability::logging::access_log;
use crate::routing::{Router, Routes};
use crate::security::token::{TokenGate, TOKEN_HEADER};
use crate::security::Accounts;

/// Build the token gate described by `auth`.
///
/// Values are expected to have passed config validation; anything invalid
/// falls back to the defaults with a warning.
pub fn token_gate(auth: &AuthConfig) -> TokenGate {
    let header = HeaderName::try_from(auth.token_header.as_str()).unwrap_or_else(|_| {
        tracing::warn!(header = %auth.token_header, "Invalid token header; using default");
        HeaderName::from_static(TOKEN_HEADER)
    });
    let status = StatusCode::from_u16(auth.token_failure_status)
        .ok()
        .filter(|s| s.is_client_error() || s.is_server_error())
        .unwrap_or_else(|| {
            tracing::warn!(
                status = auth.token_failure_status,
                "Invalid token failure status; using 401"
            );
            StatusCode::UNAUTHORIZED
        });
    TokenGate::new(auth.token.clone())
        .with_header(header)
        .with_failure_status(status)
}

/// Register every demo route on a fresh router.
pub fn build_router(config: &AppConfig) -> Result<Router, RouteError> {
    let mut router = Router::new();
    router.use_middleware(access_log());

    router
        .handle(
            Method::GET,
            "/getData",
            vec![token_gate(&config.auth).into_middleware(), from_fn(handlers::add_header)],
            handlers::get_data,
        )?
        .get("/getData1", handlers::get_data1)?
        .get("/getData2", handlers::get_data2)?
        .get("/ping", handlers::ping)?
        .get("/me/:id", handlers::get_user)?
        .post("/me", handlers::save_user)?
        .put("/me", handlers::save_user)?
        .patch("/me", handlers::save_user)?
        .delete("/me/:key", handlers::delete_user)?
        .get("/get-QryStr", handlers::query_string)?
        .get("/get-UrlParams/:name/:age", handlers::url_params)?;

    let accounts: Accounts = config.auth.accounts.clone().into_iter().collect();
    admin::register(&mut router, accounts, &config.auth.realm)?;

    Ok(router)
}
