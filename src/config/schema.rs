//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the forwarder.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Upstream origin used when no config file overrides it.
pub const DEFAULT_UPSTREAM_BASE: &str = "https://api-tst.trymighty.com";

/// Root configuration for the forwarder.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ForwarderConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream API the `/api` prefix is forwarded to.
    pub upstream: UpstreamConfig,

    /// Static site served for every non-API request.
    pub site: SiteConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request hardening.
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// What to send upstream when the client sent no `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AbsentAuthorization {
    /// Send no `Authorization` header at all.
    #[default]
    Omit,
    /// Send the literal string `undefined`, as the legacy frontend server did.
    LiteralUndefined,
}

/// Upstream API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Origin that `/api/...` paths are resolved against.
    pub base_url: String,

    /// Forward the client's `Cookie` header on the upstream leg.
    pub forward_cookies: bool,

    /// Behaviour when the client sent no `Authorization` header.
    pub absent_authorization: AbsentAuthorization,

    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` for the upstream leg.
    pub use_system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_BASE.to_string(),
            forward_cookies: true,
            absent_authorization: AbsentAuthorization::Omit,
            use_system_proxy: true,
        }
    }
}

/// Static site configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory holding the built frontend.
    pub root: PathBuf,

    /// File (relative to `root`) served for unknown paths.
    pub fallback: Option<PathBuf>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("build"),
            fallback: Some(PathBuf::from("index.html")),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config: ForwarderConfig = toml::from_str("").unwrap();
        assert_eq!(config.upstream.base_url, DEFAULT_UPSTREAM_BASE);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert!(config.upstream.forward_cookies);
        assert_eq!(config.upstream.absent_authorization, AbsentAuthorization::Omit);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: ForwarderConfig = toml::from_str(
            r#"
            [upstream]
            base_url = "http://127.0.0.1:9000"
            absent_authorization = "literal-undefined"

            [site]
            root = "public"
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.base_url, "http://127.0.0.1:9000");
        assert_eq!(
            config.upstream.absent_authorization,
            AbsentAuthorization::LiteralUndefined
        );
        assert!(config.upstream.forward_cookies);
        assert_eq!(config.site.root, PathBuf::from("public"));
        assert_eq!(config.site.fallback, Some(PathBuf::from("index.html")));
        assert_eq!(config.security.max_body_size, 2 * 1024 * 1024);
    }
}
