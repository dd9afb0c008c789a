//! The request interceptor.
//!
//! Runs in front of the default pipeline for every request:
//!
//! ```text
//! OPTIONS *        → 204 preflight, nothing else happens
//! /api*            → forward upstream, re-emit with CORS headers
//! everything else  → next.run(request), untouched
//! ```
//!
//! All failures on the forwarding branch are converted into the 500
//! envelope in one place (`intercept`), so `forward` can use `?` freely.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, ORIGIN},
        HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::cors::{apply_cors_headers, no_content_response, preflight_response, Credentials};
use crate::http::error::ForwardError;
use crate::http::forward::{is_api_path, UpstreamClient, UpstreamRequest, UpstreamResponse};
use crate::http::payload::Payload;
use crate::http::request::request_id;
use crate::observability::metrics::{self, Branch};

/// State shared by every invocation of the interceptor.
#[derive(Clone)]
pub struct InterceptorState {
    upstream: Arc<UpstreamClient>,
    max_body_size: usize,
}

impl InterceptorState {
    pub fn new(upstream: UpstreamClient, max_body_size: usize) -> Self {
        Self {
            upstream: Arc::new(upstream),
            max_body_size,
        }
    }
}

/// Middleware entry point.
pub async fn intercept(
    State(state): State<InterceptorState>,
    request: Request,
    next: Next,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let request_id = request_id(request.headers()).to_string();

    let (branch, response) = if method == Method::OPTIONS {
        (Branch::Preflight, preflight_response())
    } else if is_api_path(request.uri().path()) {
        tracing::debug!(
            request_id = %request_id,
            method = %method,
            uri = %request.uri(),
            "Proxying request"
        );
        let response = match forward(&state, request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "Forwarding failed");
                e.into_response()
            }
        };
        (Branch::Proxy, response)
    } else {
        (Branch::Passthrough, next.run(request).await)
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), branch, start_time);
    response
}

async fn forward(state: &InterceptorState, request: Request) -> Result<Response, ForwardError> {
    let (parts, body) = request.into_parts();
    let url = state.upstream.target_url(parts.uri.path(), parts.uri.query())?;

    let body = if parts.method != Method::GET {
        let bytes = axum::body::to_bytes(body, state.max_body_size)
            .await
            .map_err(ForwardError::ReadBody)?;
        let content_type = parts.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
        Some(Payload::parse_strict(content_type, &bytes)?).filter(|payload| !payload.is_falsy())
    } else {
        None
    };

    let upstream_request = UpstreamRequest {
        method: parts.method,
        url,
        origin: parts.headers.get(ORIGIN).cloned(),
        authorization: parts.headers.get(AUTHORIZATION).cloned(),
        cookie: parts.headers.get(COOKIE).cloned(),
        body,
    };

    let upstream_response = state.upstream.send(upstream_request).await?;
    Ok(client_response(upstream_response))
}

/// Re-emit an upstream answer to the client.
fn client_response(upstream: UpstreamResponse) -> Response {
    if upstream.status == StatusCode::NO_CONTENT {
        return no_content_response();
    }

    let content_type = upstream.content_type.as_ref().and_then(|v| v.to_str().ok());
    let text = Payload::parse_lenient(content_type, &upstream.body).into_body_text();

    let mut response = Response::new(Body::from(text));
    *response.status_mut() = upstream.status;
    let headers = response.headers_mut();
    apply_cors_headers(headers, Credentials::Allowed);
    headers.insert(
        CONTENT_TYPE,
        upstream
            .content_type
            .unwrap_or_else(|| HeaderValue::from_static("application/json")),
    );
    response
}
