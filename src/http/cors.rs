//! CORS header set attached to every response the interceptor produces.
//!
//! The policy is fixed: any origin, the five methods the frontend uses, and
//! the three request headers it sends. Proxied responses additionally allow
//! credentials; the preflight answer does not.

use axum::{
    body::Body,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderMap, HeaderValue, StatusCode,
    },
    response::Response,
};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization, Accept";

/// Whether `Access-Control-Allow-Credentials` is part of the header set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credentials {
    Omitted,
    Allowed,
}

/// Insert the CORS headers, overwriting any existing values.
pub fn apply_cors_headers(headers: &mut HeaderMap, credentials: Credentials) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(ALLOW_ORIGIN));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
    if credentials == Credentials::Allowed {
        headers.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
    }
}

/// Canned answer to a preflight `OPTIONS` request.
pub fn preflight_response() -> Response {
    empty_response(Credentials::Omitted)
}

/// Echo of an upstream `204 No Content`.
pub fn no_content_response() -> Response {
    empty_response(Credentials::Allowed)
}

fn empty_response(credentials: Credentials) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::NO_CONTENT;
    apply_cors_headers(response.headers_mut(), credentials);
    response
}
