//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde and the env overlay handle syntax)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Check that upstream URLs are http(s) and header values are sendable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use axum::http::HeaderValue;
use url::Url;

use crate::config::schema::GatewayConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub(crate) fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a loaded configuration, collecting every problem.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::new("listener.port", "must be a positive number"));
    }
    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::new("listener.host", "must not be empty"));
    }

    check_http_url(&mut errors, "cms.endpoint", config.cms.endpoint.as_ref());
    check_http_url(&mut errors, "cms.hero_endpoint", config.cms.hero_endpoint.as_ref());
    check_http_url(&mut errors, "catalog.products_url", config.catalog.products_url.as_ref());

    if let Some(auth) = &config.cms.auth_header {
        if HeaderValue::from_str(auth).is_err() {
            errors.push(ValidationError::new(
                "cms.auth_header",
                "contains characters not allowed in a header value",
            ));
        }
    }

    if let Some(key) = &config.security.api_key {
        if key.is_empty() {
            errors.push(ValidationError::new("security.api_key", "must not be empty when set"));
        }
    }

    let origin = config.security.cors_origin.as_str();
    if origin != "*" && (Url::parse(origin).is_err() || HeaderValue::from_str(origin).is_err()) {
        errors.push(ValidationError::new(
            "security.cors_origin",
            format!("'{}' is neither '*' nor a valid origin", origin),
        ));
    }

    if config.rate_limit.enabled {
        if config.rate_limit.max_requests == 0 {
            errors.push(ValidationError::new("rate_limit.max_requests", "must be > 0"));
        }
        if config.rate_limit.window_secs == 0 {
            errors.push(ValidationError::new("rate_limit.window_secs", "must be > 0"));
        }
    }

    let timeouts = &config.timeouts;
    if timeouts.connect_secs == 0 {
        errors.push(ValidationError::new("timeouts.connect_secs", "must be > 0"));
    }
    if timeouts.upstream_secs == 0 {
        errors.push(ValidationError::new("timeouts.upstream_secs", "must be > 0"));
    }
    if timeouts.request_secs <= timeouts.upstream_secs {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            "must be greater than timeouts.upstream_secs",
        ));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_http_url(errors: &mut Vec<ValidationError>, field: &'static str, url: Option<&Url>) {
    if let Some(url) = url {
        if !matches!(url.scheme(), "http" | "https") {
            errors.push(ValidationError::new(
                field,
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
    }
}
