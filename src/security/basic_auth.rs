//! HTTP Basic authentication gate.
//!
//! # Responsibilities
//! - Decode `Authorization: Basic <base64(user:password)>`
//! - Check the pair against an immutable account table
//! - Record the authenticated user on the request context
//!
//! # Design Decisions
//! - Accounts are fixed at startup and shared read-only
//! - Every failure (missing header, bad encoding, unknown user, wrong
//!   password) is the same 401 with a `WWW-Authenticate` challenge

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::chain::{from_fn, MiddlewareFn};

pub const DEFAULT_REALM: &str = "Authorization Required";

/// Username → password table for basic authentication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accounts(BTreeMap<String, String>);

impl Accounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.0.insert(user.into(), password.into());
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the user name when `authorization` carries valid credentials.
    pub fn authenticate<'a>(&'a self, authorization: Option<&str>) -> Option<&'a str> {
        let (user, password) = decode_basic(authorization?)?;
        match self.0.get_key_value(user.as_str()) {
            Some((known, expected)) if *expected == password => Some(known.as_str()),
            _ => None,
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Accounts {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Split a `Basic` credential header into (user, password).
fn decode_basic(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

/// Basic-auth gate with the default realm.
pub fn basic_auth(accounts: Accounts) -> MiddlewareFn {
    basic_auth_for_realm(accounts, DEFAULT_REALM)
}

/// Basic-auth gate whose challenge names `realm`.
pub fn basic_auth_for_realm(accounts: Accounts, realm: &str) -> MiddlewareFn {
    let accounts = Arc::new(accounts);
    let challenge = HeaderValue::from_str(&format!("Basic realm=\"{}\"", realm.replace('"', "")))
        .unwrap_or_else(|_| HeaderValue::from_static("Basic"));

    from_fn(move |ctx, next| {
        let user = accounts
            .authenticate(ctx.header(header::AUTHORIZATION.as_str()))
            .map(str::to_string);
        let challenge = challenge.clone();
        Box::pin(async move {
            match user {
                Some(user) => {
                    ctx.set_user(user);
                    next.run(ctx).await
                }
                None => {
                    tracing::warn!(path = %ctx.path(), "Basic authentication failed");
                    ctx.response_mut()
                        .insert_header(header::WWW_AUTHENTICATE, challenge);
                    ctx.abort_with_status(StatusCode::UNAUTHORIZED);
                    Ok(())
                }
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{handler_fn, run_chain};
    use crate::context::RequestContext;
    use axum::body::Bytes;
    use axum::http::Request;

    fn accounts() -> Accounts {
        Accounts::new().with("user", "passw").with("admin", "s3cret")
    }

    fn basic(user: &str, password: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
    }

    async fn call(authorization: Option<&str>) -> RequestContext {
        let mut builder = Request::builder().uri("/admin/getData");
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        let mut ctx = RequestContext::from_request(builder.body(Bytes::new()).unwrap());
        let handler = handler_fn(|ctx| {
            Box::pin(async move {
                let user = ctx.user().unwrap_or_default().to_string();
                ctx.json(StatusCode::OK, &user)
            })
        });
        run_chain(&[basic_auth(accounts())], &handler, &mut ctx)
            .await
            .unwrap();
        ctx
    }

    #[test]
    fn test_authenticate() {
        let accounts = accounts();
        assert_eq!(accounts.authenticate(Some(&basic("user", "passw"))), Some("user"));
        assert_eq!(accounts.authenticate(Some(&basic("user", "nope"))), None);
        assert_eq!(accounts.authenticate(Some(&basic("ghost", "passw"))), None);
        assert_eq!(accounts.authenticate(Some("Bearer abc")), None);
        assert_eq!(accounts.authenticate(Some("Basic !!!not-base64")), None);
        assert_eq!(accounts.authenticate(None), None);
    }

    #[test]
    fn test_scheme_case_insensitive_and_colon_in_password() {
        let accounts = Accounts::new().with("svc", "a:b:c");
        let value = format!("basic {}", STANDARD.encode("svc:a:b:c"));
        assert_eq!(accounts.authenticate(Some(&value)), Some("svc"));
    }

    #[tokio::test]
    async fn test_valid_credentials_reach_handler() {
        let ctx = call(Some(&basic("user", "passw"))).await;
        assert!(!ctx.is_aborted());
        assert_eq!(ctx.response().status(), StatusCode::OK);
        assert_eq!(ctx.user(), Some("user"));
        assert_eq!(&ctx.response().body()[..], br#""user""#);
    }

    #[tokio::test]
    async fn test_invalid_credentials_rejected() {
        let wrong = basic("user", "wrong");
        for authorization in [None, Some(wrong.as_str()), Some("Basic dXNlcg==")] {
            let ctx = call(authorization).await;
            assert!(ctx.is_aborted());
            assert_eq!(ctx.response().status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                ctx.response().headers()[header::WWW_AUTHENTICATE],
                "Basic realm=\"Authorization Required\""
            );
            assert!(ctx.user().is_none());
        }
    }
}
