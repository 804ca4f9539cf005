//! Admin route group.
//!
//! Every route under `/admin` sits behind HTTP Basic authentication; the
//! authenticated user name is available to the handlers.

pub mod handlers;

use crate::error::RouteError;
use crate::routing::{Router, Routes};
use crate::security::{basic_auth_for_realm, Accounts};

/// Register the `/admin` group on `router`.
pub fn register(router: &mut Router, accounts: Accounts, realm: &str) -> Result<(), RouteError> {
    if accounts.is_empty() {
        tracing::warn!("No admin accounts configured; /admin routes will reject every request");
    }
    let mut admin = router.group("/admin", [basic_auth_for_realm(accounts, realm)])?;
    admin
        .get("/getData", handlers::get_data)?
        .get("/me/:id", handlers::get_user)?;
    Ok(())
}
