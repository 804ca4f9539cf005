//! Demo endpoint handlers and the header-mutating middleware.
//!
//! Every response body is a typed struct; serde emits fields in declaration
//! order, so repeated requests produce byte-identical JSON.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::chain::{BoxFuture, Next};
use crate::context::RequestContext;
use crate::error::{DispatchError, DispatchResult};

#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub data: &'static str,
    pub status_code: u16,
}

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub message: &'static str,
    pub status: u16,
}

#[derive(Debug, Serialize)]
pub struct UserIdResponse<'a> {
    pub user_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse<'a> {
    pub id: &'a str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct NameAgeResponse<'a> {
    pub name: &'a str,
    pub age: &'a str,
}

/// Body accepted by `POST|PUT|PATCH /me` and echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeRequest {
    pub email: String,
    #[serde(default)]
    pub password: String,
}

fn data(ctx: &mut RequestContext, data: &'static str) -> DispatchResult {
    ctx.json(
        StatusCode::OK,
        &DataResponse {
            data,
            status_code: StatusCode::OK.as_u16(),
        },
    )
}

/// Sets `Key: Val` on the response, then continues.
pub fn add_header<'a>(ctx: &'a mut RequestContext, next: Next<'a>) -> BoxFuture<'a, DispatchResult> {
    Box::pin(async move {
        ctx.set_header("Key", "Val")?;
        next.run(ctx).await
    })
}

pub fn get_data(ctx: &mut RequestContext) -> BoxFuture<'_, DispatchResult> {
    Box::pin(async move { data(ctx, "Hi! I am GetDataHandler method()") })
}

pub fn get_data1(ctx: &mut RequestContext) -> BoxFuture<'_, DispatchResult> {
    Box::pin(async move { data(ctx, "Hi! I am GetData1Handler method()") })
}

pub fn get_data2(ctx: &mut RequestContext) -> BoxFuture<'_, DispatchResult> {
    Box::pin(async move { data(ctx, "Hi! I am GetData2Handler method()") })
}

pub fn ping(ctx: &mut RequestContext) -> BoxFuture<'_, DispatchResult> {
    Box::pin(async move {
        ctx.json(
            StatusCode::OK,
            &PingResponse {
                message: "pong",
                status: StatusCode::OK.as_u16(),
            },
        )
    })
}

pub fn get_user(ctx: &mut RequestContext) -> BoxFuture<'_, DispatchResult> {
    Box::pin(async move {
        let user_id = ctx.param("id").unwrap_or_default().to_string();
        ctx.json(StatusCode::OK, &UserIdResponse { user_id: &user_id })
    })
}

/// Shared by POST, PUT and PATCH: validates and echoes the body.
pub fn save_user(ctx: &mut RequestContext) -> BoxFuture<'_, DispatchResult> {
    Box::pin(async move {
        let me: MeRequest = ctx.bind_json()?;
        if me.email.trim().is_empty() {
            return Err(DispatchError::Validation("email is required".into()));
        }
        ctx.json(StatusCode::OK, &me)
    })
}

pub fn delete_user(ctx: &mut RequestContext) -> BoxFuture<'_, DispatchResult> {
    Box::pin(async move {
        let id = ctx.param("key").unwrap_or_default().to_string();
        ctx.json(
            StatusCode::OK,
            &DeletedResponse {
                id: &id,
                message: "Deleted",
            },
        )
    })
}

/// Echoes `?name=&age=`; missing values are empty strings.
pub fn query_string(ctx: &mut RequestContext) -> BoxFuture<'_, DispatchResult> {
    Box::pin(async move {
        let name = ctx.query("name").unwrap_or_default().to_string();
        let age = ctx.query("age").unwrap_or_default().to_string();
        ctx.json(StatusCode::OK, &NameAgeResponse { name: &name, age: &age })
    })
}

pub fn url_params(ctx: &mut RequestContext) -> BoxFuture<'_, DispatchResult> {
    Box::pin(async move {
        let name = ctx.param("name").unwrap_or_default().to_string();
        let age = ctx.param("age").unwrap_or_default().to_string();
        ctx.json(StatusCode::OK, &NameAgeResponse { name: &name, age: &age })
    })
}
