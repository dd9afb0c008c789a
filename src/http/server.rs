//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the upstream client from config
//! - Wrap the default pipeline with the interceptor
//! - Wire up middleware (request ID, tracing, panic boundary)
//! - Serve on a listener until shutdown is signalled

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::config::ForwarderConfig;
use crate::http::error::{panic_response, ForwardError};
use crate::http::forward::UpstreamClient;
use crate::http::interceptor::{intercept, InterceptorState};
use crate::http::pipeline::static_site;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::ShutdownListener;

/// HTTP server for the forwarder.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server whose default pipeline is the configured static site.
    pub fn new(config: ForwarderConfig) -> Result<Self, ForwardError> {
        let pipeline = static_site(&config.site);
        Self::with_pipeline(config, pipeline)
    }

    /// Create a server that hands non-API requests to `pipeline`.
    pub fn with_pipeline(config: ForwarderConfig, pipeline: Router) -> Result<Self, ForwardError> {
        let upstream = UpstreamClient::from_config(&config.upstream)?;
        tracing::info!(
            upstream = %upstream.base(),
            forward_cookies = config.upstream.forward_cookies,
            "Upstream configured"
        );

        let state = InterceptorState::new(upstream, config.security.max_body_size);
        let router = Self::build_router(pipeline, state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(pipeline: Router, state: InterceptorState) -> Router {
        Router::new()
            .fallback_service(pipeline)
            .layer(middleware::from_fn_with_state(state, intercept))
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The assembled router, for serving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
