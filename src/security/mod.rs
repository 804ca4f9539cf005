//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Route chain:
//!     → token.rs (fixed header must equal the configured token)
//!     → basic_auth.rs (Authorization: Basic against the account table)
//!     → continue, or abort with the gate's status and body
//! ```
//!
//! # Design Decisions
//! - Gates are ordinary middleware, scoped per route or per group
//! - Fail closed: reject on any missing or malformed credential
//! - Credentials are immutable after startup

pub mod basic_auth;
pub mod token;

pub use basic_auth::{basic_auth, basic_auth_for_realm, Accounts};
pub use token::{token_auth, TokenGate};
