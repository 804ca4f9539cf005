//! Per-request context threaded through the middleware chain.
//!
//! # Responsibilities
//! - Own the inbound request data (method, path, headers, query, params, body)
//! - Accumulate the response (status, headers, body)
//! - Track whether the chain has been short-circuited
//!
//! # Design Decisions
//! - Created fresh per request, passed by `&mut`, never shared across tasks
//! - Body is single-read: a second read yields empty bytes
//! - Path parameters are bound to the raw segment text (no percent-decoding)

use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::ConnectInfo;
use axum::http::{
    header, HeaderMap, HeaderName, HeaderValue, Method, Request, Response, StatusCode, Version,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DispatchError, DispatchResult};

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Path parameters bound during route resolution, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value bound to `name`, if the matched pattern declares it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Response accumulated while the chain runs.
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ResponseBuilder {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    /// Replace the body and its content type.
    pub fn set_body(&mut self, content_type: HeaderValue, body: impl Into<Bytes>) {
        self.headers.insert(header::CONTENT_TYPE, content_type);
        self.body = body.into();
    }

    /// Discard everything written so far, headers included.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn into_response(self) -> Response<Bytes> {
        let mut response = Response::new(self.body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// Request data plus response writer for a single in-flight request.
#[derive(Debug)]
pub struct RequestContext {
    method: Method,
    path: String,
    version: Version,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    params: PathParams,
    route: Option<String>,
    body: Bytes,
    client_addr: Option<SocketAddr>,
    user: Option<String>,
    response: ResponseBuilder,
    aborted: bool,
}

impl RequestContext {
    /// Build a context from a buffered request.
    ///
    /// The client address is taken from axum's `ConnectInfo` extension when
    /// the server was started with connect info.
    pub fn from_request(request: Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        let client_addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        let query = match parts.uri.query() {
            Some(raw) => serde_urlencoded::from_str::<Vec<(String, String)>>(raw)
                .unwrap_or_else(|e| {
                    tracing::debug!(query = raw, error = %e, "Ignoring malformed query string");
                    Vec::new()
                }),
            None => Vec::new(),
        };

        Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            version: parts.version,
            headers: parts.headers,
            query,
            params: PathParams::new(),
            route: None,
            body,
            client_addr,
            user: None,
            response: ResponseBuilder::default(),
            aborted: false,
        }
    }

    /// Attach the resolved route pattern and its parameter bindings.
    pub(crate) fn bind_route(&mut self, pattern: &str, params: PathParams) {
        self.route = Some(pattern.to_string());
        self.params = params;
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Pattern of the matched route (e.g. `/me/:id`), `None` for fallbacks.
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value by case-insensitive name. Non-ASCII values read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// First query value for `name`.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    pub fn params(&self) -> &PathParams {
        &self.params
    }

    pub fn client_addr(&self) -> Option<SocketAddr> {
        self.client_addr
    }

    pub fn request_id(&self) -> Option<&str> {
        self.header(crate::http::X_REQUEST_ID)
    }

    /// Take the raw body. Subsequent calls return empty bytes.
    pub fn take_body(&mut self) -> Bytes {
        std::mem::take(&mut self.body)
    }

    /// Take the body and deserialize it as JSON.
    ///
    /// Malformed input or missing required fields yield `Validation`.
    pub fn bind_json<T: DeserializeOwned>(&mut self) -> Result<T, DispatchError> {
        let body = self.take_body();
        serde_json::from_slice(&body).map_err(|e| DispatchError::Validation(e.to_string()))
    }

    /// Name of the authenticated user, if an auth gate recorded one.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn set_user(&mut self, user: impl Into<String>) {
        self.user = Some(user.into());
    }

    pub fn response(&self) -> &ResponseBuilder {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut ResponseBuilder {
        &mut self.response
    }

    /// Serialize `value` as the JSON response body with `status`.
    pub fn json<T: Serialize + ?Sized>(&mut self, status: StatusCode, value: &T) -> DispatchResult {
        let body = serde_json::to_vec(value)
            .map_err(|e| DispatchError::Internal(format!("failed to serialize response: {e}")))?;
        self.response.set_status(status);
        self.response
            .set_body(HeaderValue::from_static(JSON_CONTENT_TYPE), body);
        Ok(())
    }

    /// Set a response header from string parts.
    pub fn set_header(&mut self, name: &str, value: &str) -> DispatchResult {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| DispatchError::Internal(format!("invalid header name {name:?}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| DispatchError::Internal(format!("invalid header value: {e}")))?;
        self.response.insert_header(name, value);
        Ok(())
    }

    /// Write a JSON response and stop the chain.
    pub fn abort_with_json<T: Serialize + ?Sized>(
        &mut self,
        status: StatusCode,
        value: &T,
    ) -> DispatchResult {
        self.aborted = true;
        self.json(status, value)
    }

    /// Set the status without a body and stop the chain.
    pub fn abort_with_status(&mut self, status: StatusCode) {
        self.aborted = true;
        self.response.set_status(status);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn into_response(self) -> Response<Bytes> {
        self.response.into_response()
    }
}
