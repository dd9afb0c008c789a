//! Default request pipeline.
//!
//! Whatever is not preflight and not `/api` ends up here. The stock
//! pipeline serves the built frontend from disk; `HttpServer::with_pipeline`
//! accepts any other `Router` in its place.

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::SiteConfig;

/// Static-file pipeline for the built frontend.
///
/// With a fallback configured, unknown paths are answered with that file so
/// client-side routes survive a page reload.
pub fn static_site(site: &SiteConfig) -> Router {
    let files = ServeDir::new(&site.root);
    match &site.fallback {
        Some(fallback) => {
            Router::new().fallback_service(files.fallback(ServeFile::new(site.root.join(fallback))))
        }
        None => Router::new().fallback_service(files),
    }
}
