//! Upstream leg of a proxied `/api` request.
//!
//! # Responsibilities
//! - Derive the upstream URL from the inbound path and query
//! - Apply the fixed outbound headers and the forwarded ones
//! - Perform exactly one upstream call and buffer its answer
//!
//! # Design Decisions
//! - No retries, no timeouts: a failed call surfaces immediately
//! - Only `Origin`, `Authorization` and `Cookie` cross from the client;
//!   everything else on the outbound request is fixed

use axum::body::Bytes;
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, COOKIE, ORIGIN},
    HeaderMap, HeaderValue, Method, StatusCode,
};
use url::{form_urlencoded, Url};

use crate::config::{AbsentAuthorization, UpstreamConfig};
use crate::http::error::ForwardError;
use crate::http::payload::Payload;

/// Path prefix that marks a request for the upstream API.
pub const API_PREFIX: &str = "/api";

/// Returns true if the path should be forwarded upstream.
pub fn is_api_path(path: &str) -> bool {
    path.starts_with(API_PREFIX)
}

/// Request sent to the upstream API.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: Url,
    pub origin: Option<HeaderValue>,
    pub authorization: Option<HeaderValue>,
    pub cookie: Option<HeaderValue>,
    pub body: Option<Payload>,
}

/// Buffered upstream answer.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Client for the configured upstream origin.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base: Url,
    forward_cookies: bool,
    absent_authorization: AbsentAuthorization,
}

impl UpstreamClient {
    /// Build a client for the configured upstream.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, ForwardError> {
        let base = Url::parse(&config.base_url)?;
        let mut builder = reqwest::Client::builder();
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base,
            forward_cookies: config.forward_cookies,
            absent_authorization: config.absent_authorization,
        })
    }

    /// The upstream origin requests are resolved against.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Upstream URL for an inbound path and raw query string.
    ///
    /// The first `/api` is removed and the remainder is resolved as a URL
    /// reference against the base, so `/api/users` maps to `<base>/users`.
    /// Query pairs are re-appended one by one, keeping order and duplicates.
    pub fn target_url(&self, path: &str, query: Option<&str>) -> Result<Url, ForwardError> {
        let relative = path.replacen(API_PREFIX, "", 1);
        let mut url = self.base.join(&relative)?;

        if url.origin() != self.base.origin() {
            return Err(ForwardError::ForeignTarget(url));
        }

        if let Some(query) = query {
            let mut pairs = form_urlencoded::parse(query.as_bytes()).peekable();
            if pairs.peek().is_some() {
                url.query_pairs_mut().extend_pairs(pairs);
            }
        }
        Ok(url)
    }

    /// Outbound header set for a request.
    fn outbound_headers(&self, request: &UpstreamRequest) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            ORIGIN,
            request
                .origin
                .clone()
                .unwrap_or_else(|| HeaderValue::from_static("*")),
        );

        match (&request.authorization, self.absent_authorization) {
            (Some(value), _) => {
                headers.insert(AUTHORIZATION, value.clone());
            }
            (None, AbsentAuthorization::LiteralUndefined) => {
                headers.insert(AUTHORIZATION, HeaderValue::from_static("undefined"));
            }
            (None, AbsentAuthorization::Omit) => {}
        }

        if self.forward_cookies {
            if let Some(cookie) = &request.cookie {
                headers.insert(COOKIE, cookie.clone());
            }
        }
        headers
    }

    /// Perform the upstream call and buffer the response.
    pub async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, ForwardError> {
        let headers = self.outbound_headers(&request);

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            has_body = request.body.is_some(),
            "Forwarding upstream"
        );

        let mut builder = self
            .http
            .request(request.method, request.url)
            .headers(headers);
        if let Some(body) = &request.body {
            builder = builder.body(body.to_json_text());
        }

        let response = builder.send().await?;
        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response.bytes().await?;

        tracing::debug!(
            status = %status,
            content_type = ?content_type,
            body_len = body.len(),
            "Upstream responded"
        );

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}
