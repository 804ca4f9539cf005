//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Emit one access-log event per dispatched request
//! - Configure log level at runtime
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - Log level configurable via config and environment (`RUST_LOG` wins)
//! - Optional file sink mirrors stdout without ANSI colours

use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::Instant;

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chain::{from_fn, MiddlewareFn};
use crate::config::{LogFormat, ObservabilityConfig};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to open log file '{path}': {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("logging already initialised: {0}")]
    Init(#[from] TryInitError),
}

/// Install the global subscriber. Call once, from the binary.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("route_chain={level},tower_http={level}", level = config.log_level).into()
    });

    let (pretty, json) = match config.log_format {
        LogFormat::Pretty => (Some(fmt::layer()), None),
        LogFormat::Json => (None, Some(fmt::layer().json())),
    };

    let file = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::File {
                    path: path.clone(),
                    source,
                })?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .with(file)
        .try_init()?;
    Ok(())
}

/// Middleware logging method, path, status and latency of each request.
///
/// Register it first so the recorded latency covers the whole chain.
pub fn access_log() -> MiddlewareFn {
    from_fn(|ctx, next| {
        let start = Instant::now();
        Box::pin(async move {
            let result = next.run(ctx).await;
            let status = match &result {
                Ok(()) => ctx.response().status(),
                Err(err) => err.status_code(),
            };
            let client_ip = ctx
                .client_addr()
                .map(|addr| addr.ip().to_string())
                .unwrap_or_default();
            tracing::info!(
                method = %ctx.method(),
                path = %ctx.path(),
                route = ctx.route().unwrap_or("-"),
                status = status.as_u16(),
                latency_ms = start.elapsed().as_secs_f64() * 1000.0,
                client_ip = %client_ip,
                request_id = ctx.request_id().unwrap_or("-"),
                user_agent = ctx.header("user-agent").unwrap_or("-"),
                protocol = ?ctx.version(),
                error = ?result.as_ref().err(),
                "Request completed"
            );
            result
        })
    })
}
