//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Build the per-request span carrying the correlation id
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level when set
//! - JSON format for production, text format for development

use axum::{body::Body, http::Request};
use tracing::Span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};
use crate::http::request::RequestIdExt;

/// Default filter for a configured level: our crate and tower-http at that
/// level, everything else at warn.
pub fn default_filter(level: &str) -> String {
    let level = level.to_ascii_lowercase();
    format!("warn,content_gateway={0},tower_http={0}", level)
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&config.log_level)));

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
    }
}

/// Span for one inbound request; used by the HTTP trace layer.
pub fn request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = request.request_id().unwrap_or("-"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(
            default_filter("DEBUG"),
            "warn,content_gateway=debug,tower_http=debug"
        );
        assert!(EnvFilter::try_new(default_filter("info")).is_ok());
    }
}
