//! route-chain server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ─────────────▶ axum + tower layers (trace, request id, timeout)
//!                        │
//!                        ▼
//!                   body limit + buffering
//!                        │
//!                        ▼
//!                   Dispatcher ──▶ RouteTable::resolve
//!                        │              │
//!                        │      ┌───────┴────────┐
//!                        │      ▼                ▼
//!                        │  route chain      root middleware
//!                        │  (gates, etc.)    + 404/405 fallback
//!                        │      │
//!                        │      ▼
//!                        │  terminal handler
//!                        ▼
//!     Client Response ◀── RequestContext response (panic → 500)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use route_chain::config::{self, validate_config, LogFormat};
use route_chain::observability::{logging, metrics};
use route_chain::{app, HttpServer};

#[derive(Parser)]
#[command(name = "route-chain")]
#[command(about = "HTTP dispatch server with middleware chains and scoped authentication", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overriding config and environment
    #[arg(short, long)]
    bind: Option<String>,

    /// Log format: pretty or json
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// Print the route table and exit
    #[arg(long)]
    print_routes: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = config::read_config(cli.config.as_deref(), |name| std::env::var(name).ok())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(format) = cli.log_format {
        config.observability.log_format = format;
    }
    validate_config(&config).map_err(config::ConfigError::Validation)?;

    if cli.print_routes {
        let router = app::build_router(&config)?;
        for route in router.table().routes() {
            println!(
                "{:<7} {:<28} handlers={} {}",
                route.method(),
                route.path(),
                route.chain().len() + 1,
                route.handler_name()
            );
        }
        return Ok(());
    }

    logging::init_logging(&config.observability)?;

    tracing::info!("route-chain v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_body_bytes = config.listener.max_body_bytes,
        request_timeout_secs = config.timeouts.request_secs,
        admin_accounts = config.auth.accounts.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let server = HttpServer::new(config)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
