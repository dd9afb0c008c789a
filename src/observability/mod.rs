//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Interceptor and server produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and histograms per branch)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID (`x-request-id`) is attached to every log line about a request
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
