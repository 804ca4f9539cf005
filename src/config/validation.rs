//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses parse and value ranges hold (timeouts > 0)
//! - Validate auth settings produce a usable gate
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use axum::http::HeaderName;

use crate::config::schema::AppConfig;

/// One semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. `listener.bind_address`).
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check every semantic constraint and report all failures.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::new("listener.max_body_bytes", "must be greater than 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    let auth = &config.auth;
    if auth.token.is_empty() {
        errors.push(ValidationError::new("auth.token", "must not be empty"));
    }
    if auth.token_header.is_empty() {
        errors.push(ValidationError::new("auth.token_header", "must not be empty"));
    } else if HeaderName::try_from(auth.token_header.as_str()).is_err() {
        errors.push(ValidationError::new(
            "auth.token_header",
            format!("'{}' is not a valid header name", auth.token_header),
        ));
    }
    if !(400..=599).contains(&auth.token_failure_status) {
        errors.push(ValidationError::new(
            "auth.token_failure_status",
            format!("{} is not an error status (400..=599)", auth.token_failure_status),
        ));
    }
    if auth.accounts.keys().any(|user| user.is_empty()) {
        errors.push(ValidationError::new("auth.accounts", "usernames must not be empty"));
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&AppConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        config.auth.token = String::new();
        config.auth.token_header = "bad header".into();
        config.auth.token_failure_status = 200;
        config.auth.accounts.insert(String::new(), "pw".into());

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "timeouts.request_secs",
                "auth.token",
                "auth.token_header",
                "auth.token_failure_status",
                "auth.accounts",
            ]
        );
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "observability.metrics_address");
    }

    #[test]
    fn test_legacy_token_status_is_valid() {
        let mut config = AppConfig::default();
        config.auth.token_failure_status = 500;
        assert!(validate_config(&config).is_ok());
    }
}
