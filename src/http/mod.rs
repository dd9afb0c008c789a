//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID assigned)
//!     → interceptor.rs
//!         OPTIONS → cors.rs preflight
//!         /api*   → forward.rs (upstream call) → payload.rs → cors.rs
//!         other   → pipeline.rs (static site)
//!     → error.rs on any failure or panic
//!     → Send to client
//! ```

pub mod cors;
pub mod error;
pub mod forward;
pub mod interceptor;
pub mod payload;
pub mod pipeline;
pub mod request;
pub mod server;

pub use error::ForwardError;
pub use forward::{UpstreamClient, API_PREFIX};
pub use request::X_REQUEST_ID;
pub use server::HttpServer;
