//! Error boundary for the interceptor.
//!
//! Every failure on the `/api` path, and any panic inside the stack, turns
//! into the same response: status 500, CORS headers, and a JSON envelope
//! `{"error": "Internal Server Error", "message": <text>}`.

use std::any::Any;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::http::cors::{apply_cors_headers, Credentials};

/// Failure while forwarding an `/api` request.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("failed to read request body: {0}")]
    ReadBody(#[source] axum::Error),

    #[error("{0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid upstream target: {0}")]
    InvalidTarget(#[from] url::ParseError),

    #[error("upstream target {0} is outside the configured origin")]
    ForeignTarget(Url),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: &'static str,
    message: &'a str,
}

/// Build the 500 envelope for an arbitrary message.
pub fn internal_error_response(message: &str) -> Response {
    let envelope = ErrorEnvelope {
        error: "Internal Server Error",
        message,
    };
    let body = serde_json::to_string(&envelope)
        .unwrap_or_else(|_| r#"{"error":"Internal Server Error"}"#.to_string());

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    apply_cors_headers(headers, Credentials::Allowed);
    response
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        internal_error_response(&self.to_string())
    }
}

/// Response for a panic caught by `CatchPanicLayer`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "handler panicked"
    };

    tracing::error!(message = %message, "Handler panicked");
    internal_error_response(message)
}
