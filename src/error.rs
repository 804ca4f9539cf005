//! Error types shared by the routing core and the dispatcher.
//!
//! # Status Mapping
//! - `NotFound` → 404
//! - `MethodNotAllowed` → 405 (with `Allow` header)
//! - `Unauthorized` → 401
//! - `Validation` → 400
//! - `PayloadTooLarge` → 413
//! - `Internal` → 500

use axum::http::{Method, StatusCode};
use serde::Serialize;
use thiserror::Error;

/// Errors produced while registering or resolving routes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// An identical (method, pattern) pair is already registered.
    #[error("duplicate route: {method} {pattern}")]
    DuplicateRoute { method: Method, pattern: String },

    /// The pattern could not be parsed.
    #[error("invalid route pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: &'static str },

    /// No pattern matches the path.
    #[error("no route matches {path}")]
    NotFound { path: String },

    /// A pattern matches the path, but not under the requested method.
    #[error("method {method} not allowed for {path}")]
    MethodNotAllowed {
        method: Method,
        path: String,
        allowed: Vec<Method>,
    },
}

/// Errors a middleware or handler may return.
///
/// The dispatcher turns these into responses; none of them escape the
/// request that raised them.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    #[error("route not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotAllowed { allowed: Vec<Method> },

    #[error("authentication failed")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("internal error: {0}")]
    Internal(String),
}

impl DispatchError {
    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            DispatchError::NotFound => StatusCode::NOT_FOUND,
            DispatchError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            DispatchError::Unauthorized => StatusCode::UNAUTHORIZED,
            DispatchError::Validation(_) => StatusCode::BAD_REQUEST,
            DispatchError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            DispatchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body sent to the client for this error.
    ///
    /// Internal errors are reported generically; the detail goes to the log.
    pub fn body(&self) -> ErrorBody {
        let error = match self {
            DispatchError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        };
        ErrorBody {
            error,
            status_code: self.status_code().as_u16(),
        }
    }
}

impl From<RouteError> for DispatchError {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::NotFound { .. } => DispatchError::NotFound,
            RouteError::MethodNotAllowed { allowed, .. } => {
                DispatchError::MethodNotAllowed { allowed }
            }
            other => DispatchError::Internal(other.to_string()),
        }
    }
}

/// Generic error payload: `{"error": ..., "status_code": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub status_code: u16,
}

pub type DispatchResult = Result<(), DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(DispatchError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            DispatchError::MethodNotAllowed { allowed: vec![] }.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(DispatchError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            DispatchError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DispatchError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let body = DispatchError::Internal("db password leaked".into()).body();
        assert_eq!(body.error, "internal server error");
        assert_eq!(body.status_code, 500);
    }

    #[test]
    fn test_route_error_conversion() {
        let err: DispatchError = RouteError::MethodNotAllowed {
            method: Method::POST,
            path: "/ping".into(),
            allowed: vec![Method::GET],
        }
        .into();
        assert!(matches!(err, DispatchError::MethodNotAllowed { ref allowed } if *allowed == vec![Method::GET]));
    }
}
