//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     Router / Group (prefix + inherited middleware)
//!     → matcher.rs (parse pattern into segments)
//!     → router.rs (insert into segment trie, reject duplicates)
//!     → Freeze as immutable RouteTable inside the Dispatcher
//!
//! Incoming Request (method, path)
//!     → router.rs (trie walk: literal, then :param, then *catch-all)
//!     → Return: Match { route, params } | NotFound | MethodNotAllowed
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same input always matches same route

pub mod group;
pub mod matcher;
pub mod router;

pub use group::{Group, Router, Routes};
pub use matcher::{Pattern, Segment};
pub use router::{Match, Route, RouteTable};
