//! API forwarder library.
//!
//! Everything the `api-forwarder` server and `forwarder-cli` binaries are
//! built from.

pub mod client;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::ForwarderConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
