//! Client side of the forwarder.
//!
//! Used by `forwarder-cli` to call `/api` routes the way the browser
//! frontend does, with the auth record kept in an `AuthStore`.

pub mod api;
pub mod auth;

use thiserror::Error;

pub use api::ApiClient;
pub use auth::{AuthError, AuthPersistence, AuthStore, FilePersistence, MemoryPersistence};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}
