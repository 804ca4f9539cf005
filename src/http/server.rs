//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router that feeds every request to the dispatcher
//! - Wire up middleware (tracing, timeout, request ID)
//! - Enforce the request body limit and buffer bodies
//! - Bind server to listener and shut down gracefully

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, Request},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::app;
use crate::config::AppConfig;
use crate::dispatch::Dispatcher;
use crate::error::{DispatchError, RouteError};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub max_body_bytes: usize,
}

/// HTTP server hosting the dispatcher.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a server exposing the application routes.
    pub fn new(config: AppConfig) -> Result<Self, RouteError> {
        let dispatcher = Dispatcher::new(app::build_router(&config)?);
        Ok(Self::with_dispatcher(config, dispatcher))
    }

    /// Create a server around an already-built dispatcher.
    pub fn with_dispatcher(config: AppConfig, dispatcher: Dispatcher) -> Self {
        let state = AppState {
            dispatcher: Arc::new(dispatcher),
            max_body_bytes: config.listener.max_body_bytes,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Buffers the body and hands the request to the dispatcher.
///
/// Oversized and unreadable bodies are still answered by the dispatcher so
/// root middleware and metrics see them.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();

    let response = match content_length(&parts.headers) {
        Some(length) if length > state.max_body_bytes => {
            tracing::warn!(
                path = %parts.uri.path(),
                content_length = length,
                limit = state.max_body_bytes,
                "Request body too large"
            );
            let err = DispatchError::PayloadTooLarge {
                limit: state.max_body_bytes,
            };
            state
                .dispatcher
                .reject(Request::from_parts(parts, Bytes::new()), err)
                .await
        }
        _ => match axum::body::to_bytes(body, state.max_body_bytes).await {
            Ok(bytes) => state.dispatcher.handle(Request::from_parts(parts, bytes)).await,
            Err(e) => {
                tracing::error!(path = %parts.uri.path(), error = %e, "Failed to read request body");
                state
                    .dispatcher
                    .reject(
                        Request::from_parts(parts, Bytes::new()),
                        DispatchError::Internal(e.to_string()),
                    )
                    .await
            }
        },
    };

    let (parts, body) = response.into_parts();
    Response::from_parts(parts, Body::from(body))
}

fn content_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
