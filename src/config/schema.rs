//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits so a TOML file can seed them before the
//! environment overlay is applied.

use serde::{Deserialize, Serialize};
use url::Url;

/// Root configuration for the content gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Headless CMS upstream.
    pub cms: CmsConfig,

    /// Product catalog upstream.
    pub catalog: CatalogConfig,

    /// Caller authentication, CORS and hardening.
    pub security: SecurityConfig,

    /// Request-rate ceiling.
    pub rate_limit: RateLimitConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4001,
        }
    }
}

/// How the home page query reaches the CMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CmsMode {
    /// Persisted query fetched with GET, `path` as a query parameter.
    #[default]
    PersistedGet,
    /// GraphQL document sent with POST, `path` as a variable.
    GraphqlPost,
}

impl std::str::FromStr for CmsMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PERSISTED_GET" => Ok(CmsMode::PersistedGet),
            "GRAPHQL_POST" => Ok(CmsMode::GraphqlPost),
            other => Err(format!(
                "expected PERSISTED_GET or GRAPHQL_POST, got '{}'",
                other
            )),
        }
    }
}

/// CMS upstream configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CmsConfig {
    /// Access mode for the home page query.
    pub mode: CmsMode,

    /// Base endpoint for the home page query.
    pub endpoint: Option<Url>,

    /// Persisted query endpoint for the hero banner.
    pub hero_endpoint: Option<Url>,

    /// Value sent verbatim as the `Authorization` header (Author or protected Publish).
    pub auth_header: Option<String>,
}

/// Product catalog configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// URL returning the product list as a JSON array.
    pub products_url: Option<Url>,
}

/// Security configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Shared secret expected in `x-api-key`. `None` disables the check.
    pub api_key: Option<String>,

    /// Allowed CORS origin, or `*`.
    pub cors_origin: String,

    /// Enable security response headers.
    pub enable_headers: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            cors_origin: "http://localhost:3000".to_string(),
            enable_headers: true,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Requests allowed per client within one window.
    pub max_requests: u64,

    /// Window length in seconds.
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 100,
            window_secs: 60,
        }
    }
}

/// Timeout configuration for upstream calls and whole requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total time allowed for one upstream call in seconds.
    pub upstream_secs: u64,

    /// Total time allowed for handling one inbound request in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 10,
            request_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human readable or JSON lines.
    pub log_format: LogFormat,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.listener.bind_address(), "0.0.0.0:4001");
        assert_eq!(config.cms.mode, CmsMode::PersistedGet);
        assert!(config.security.api_key.is_none());
        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.rate_limit.window_secs, 60);
    }

    #[test]
    fn test_partial_toml() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [cms]
            mode = "GRAPHQL_POST"
            endpoint = "https://cms.example.com/graphql"

            [listener]
            port = 8080
            "#,
        )
        .unwrap();

        assert_eq!(config.cms.mode, CmsMode::GraphqlPost);
        assert_eq!(
            config.cms.endpoint.as_ref().map(Url::as_str),
            Some("https://cms.example.com/graphql")
        );
        assert_eq!(config.listener.port, 8080);
        assert_eq!(config.listener.host, "0.0.0.0");
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("GRAPHQL_POST".parse::<CmsMode>(), Ok(CmsMode::GraphqlPost));
        assert!("graphql".parse::<CmsMode>().is_err());
    }
}
