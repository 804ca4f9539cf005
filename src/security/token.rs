//! Header-token authentication gate.
//!
//! Compares a fixed request header against one configured token (exact,
//! case-sensitive). On mismatch or absence the chain is aborted with
//! `{"Message": "Token Not Present!"}`.
//!
//! The failure status defaults to 401. Deployments that depend on the older
//! 500 behaviour can opt in with [`TokenGate::with_failure_status`].

use axum::http::{HeaderName, StatusCode};
use serde::Serialize;

use crate::chain::{from_fn, MiddlewareFn};

pub const TOKEN_HEADER: &str = "token";
pub const TOKEN_MISSING_MESSAGE: &str = "Token Not Present!";

#[derive(Debug, Serialize)]
struct TokenRejection {
    #[serde(rename = "Message")]
    message: &'static str,
}

/// Configuration for the token gate.
#[derive(Debug, Clone)]
pub struct TokenGate {
    header: HeaderName,
    expected: String,
    failure_status: StatusCode,
}

impl TokenGate {
    /// Gate on the `Token` header.
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            header: HeaderName::from_static(TOKEN_HEADER),
            expected: expected.into(),
            failure_status: StatusCode::UNAUTHORIZED,
        }
    }

    pub fn with_header(mut self, header: HeaderName) -> Self {
        self.header = header;
        self
    }

    pub fn with_failure_status(mut self, status: StatusCode) -> Self {
        self.failure_status = status;
        self
    }

    fn accepts(&self, presented: Option<&[u8]>) -> bool {
        presented == Some(self.expected.as_bytes())
    }

    pub fn into_middleware(self) -> MiddlewareFn {
        from_fn(move |ctx, next| {
            let accepted = self.accepts(ctx.headers().get(&self.header).map(|v| v.as_bytes()));
            let failure_status = self.failure_status;
            Box::pin(async move {
                if !accepted {
                    tracing::warn!(
                        path = %ctx.path(),
                        status = failure_status.as_u16(),
                        "Token authentication failed"
                    );
                    return ctx.abort_with_json(
                        failure_status,
                        &TokenRejection {
                            message: TOKEN_MISSING_MESSAGE,
                        },
                    );
                }
                next.run(ctx).await
            })
        })
    }
}

/// Token gate on the `Token` header with the default 401 failure status.
pub fn token_auth(expected: impl Into<String>) -> MiddlewareFn {
    TokenGate::new(expected).into_middleware()
}
