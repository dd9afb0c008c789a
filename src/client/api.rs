//! JSON helper for talking to the forwarder's API routes.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::client::ClientError;

/// Thin client for endpoints served by the forwarder.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Create a client for the forwarder at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http: reqwest::Client::new(),
            base: Url::parse(base_url)?,
        })
    }

    /// Absolute URL for an endpoint such as `/api/users?page=2`.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(endpoint)?)
    }

    /// Send a JSON request. The body, when given, is serialized as JSON.
    pub async fn call(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
        authorization: Option<&str>,
    ) -> Result<reqwest::Response, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(authorization) = authorization {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(authorization)?);
        }

        let mut request = self
            .http
            .request(method, self.endpoint_url(endpoint)?)
            .headers(headers);
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        Ok(request.send().await?)
    }
}
