//! Security response headers and CORS.
//!
//! # Responsibilities
//! - Add hardening headers to every response (optional)
//! - Build the CORS policy for the configured origin
//!
//! # Design Decisions
//! - Headers already set by a handler are left untouched
//! - CORS sits behind the auth gate; a preflight without the key gets 401

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Method, Request},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::http::middleware::X_API_KEY;
use crate::http::request::x_request_id;

const SECURITY_HEADERS: [(HeaderName, &str); 5] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
    (header::REFERRER_POLICY, "no-referrer"),
    (header::X_DNS_PREFETCH_CONTROL, "off"),
    (header::STRICT_TRANSPORT_SECURITY, "max-age=15552000; includeSubDomains"),
];

pub async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    for (name, value) in SECURITY_HEADERS {
        if !headers.contains_key(&name) {
            headers.insert(name, HeaderValue::from_static(value));
        }
    }
    response
}

/// CORS policy allowing `origin` (or any origin for `*`) to read the API.
pub fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(X_API_KEY),
            x_request_id(),
        ])
        .expose_headers([x_request_id(), header::CACHE_CONTROL]);

    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(AllowOrigin::exact(value)),
        Err(_) => {
            tracing::warn!(origin, "Ignoring unusable CORS origin; cross-origin reads disabled");
            layer.allow_origin(AllowOrigin::list(Vec::<HeaderValue>::new()))
        }
    }
}
