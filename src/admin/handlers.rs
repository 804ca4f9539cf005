use axum::http::StatusCode;
use serde::Serialize;

use crate::chain::BoxFuture;
use crate::context::RequestContext;
use crate::error::DispatchResult;

#[derive(Serialize)]
pub struct AdminData<'a> {
    pub data: &'static str,
    pub user: &'a str,
    pub status_code: u16,
}

#[derive(Serialize)]
pub struct AdminUser<'a> {
    pub user_id: &'a str,
    pub requested_by: &'a str,
}

pub fn get_data(ctx: &mut RequestContext) -> BoxFuture<'_, DispatchResult> {
    Box::pin(async move {
        let user = ctx.user().unwrap_or_default().to_string();
        ctx.json(
            StatusCode::OK,
            &AdminData {
                data: "Hi! I am the admin GetDataHandler method()",
                user: &user,
                status_code: StatusCode::OK.as_u16(),
            },
        )
    })
}

pub fn get_user(ctx: &mut RequestContext) -> BoxFuture<'_, DispatchResult> {
    Box::pin(async move {
        let user_id = ctx.param("id").unwrap_or_default().to_string();
        let requested_by = ctx.user().unwrap_or_default().to_string();
        ctx.json(
            StatusCode::OK,
            &AdminUser {
                user_id: &user_id,
                requested_by: &requested_by,
            },
        )
    })
}
