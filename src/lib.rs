//! HTTP request-dispatch core with composable middleware chains and scoped
//! authentication.

// Core
pub mod chain;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod routing;

// Cross-cutting concerns
pub mod config;
pub mod observability;
pub mod security;

// Surfaces
pub mod admin;
pub mod app;
pub mod http;

pub use config::schema::AppConfig;
pub use context::RequestContext;
pub use dispatch::Dispatcher;
pub use error::{DispatchError, DispatchResult, RouteError};
pub use http::HttpServer;
pub use routing::{Router, Routes};
