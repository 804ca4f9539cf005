//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{AppConfig, LogFormat};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, message: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, message } => write!(f, "Invalid {}: {}", var, message),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: AppConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load the optional file, apply process environment overrides, validate.
pub fn load_from_env(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let config = read_config(path, |name| std::env::var(name).ok())?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse the optional file and apply overrides from `lookup`, without
/// validating.
///
/// Callers layering further overrides on top (CLI flags) validate once
/// they are done.
pub fn read_config<F>(path: Option<&Path>, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => AppConfig::default(),
    };
    apply_env_overrides(config, lookup)
}

/// Apply environment overrides read through `lookup`.
///
/// `PORT` binds all interfaces; `ROUTE_CHAIN_BIND_ADDRESS` wins over it.
pub fn apply_env_overrides<F>(mut config: AppConfig, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        let port: u16 = port.trim().parse().map_err(|_| ConfigError::Env {
            var: "PORT",
            message: format!("'{}' is not a port number", port),
        })?;
        config.listener.bind_address = format!("0.0.0.0:{}", port);
    }
    if let Some(addr) = lookup("ROUTE_CHAIN_BIND_ADDRESS") {
        config.listener.bind_address = addr;
    }
    if let Some(token) = lookup("ROUTE_CHAIN_AUTH_TOKEN") {
        config.auth.token = token;
    }
    if let Some(accounts) = lookup("ROUTE_CHAIN_ADMIN_ACCOUNTS") {
        config.auth.accounts.clear();
        for pair in accounts.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (user, password) = pair.split_once(':').ok_or_else(|| ConfigError::Env {
                var: "ROUTE_CHAIN_ADMIN_ACCOUNTS",
                message: format!("'{}' is not user:password", pair),
            })?;
            config.auth.accounts.insert(user.to_string(), password.to_string());
        }
    }
    if let Some(format) = lookup("ROUTE_CHAIN_LOG_FORMAT") {
        config.observability.log_format = format
            .parse::<LogFormat>()
            .map_err(|message| ConfigError::Env {
                var: "ROUTE_CHAIN_LOG_FORMAT",
                message,
            })?;
    }
    if let Some(file) = lookup("ROUTE_CHAIN_LOG_FILE") {
        config.observability.log_file = Some(file).filter(|f| !f.is_empty());
    }
    if let Some(secs) = lookup("ROUTE_CHAIN_REQUEST_TIMEOUT_SECS") {
        config.timeouts.request_secs = secs.trim().parse().map_err(|_| ConfigError::Env {
            var: "ROUTE_CHAIN_REQUEST_TIMEOUT_SECS",
            message: format!("'{}' is not a number of seconds", secs),
        })?;
    }

    Ok(config)
}
