//! Shared-secret auth gate.
//! Runs in front of every route, `/health` and the fallback included.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::error::GatewayError;

pub const X_API_KEY: &str = "x-api-key";

/// Expected API key, if any. Cheap to clone into middleware state.
#[derive(Debug, Clone, Default)]
pub struct AuthGate {
    api_key: Option<Arc<str>>,
}

impl AuthGate {
    pub fn new(api_key: Option<&str>) -> Self {
        Self {
            api_key: api_key.map(Arc::from),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// True when no key is configured or the headers carry the right one.
    pub fn permits(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = self.api_key.as_deref() else {
            return true;
        };
        headers
            .get(X_API_KEY)
            .map(|presented| bool::from(presented.as_bytes().ct_eq(expected.as_bytes())))
            .unwrap_or(false)
    }
}

pub async fn auth_gate_middleware(
    State(gate): State<AuthGate>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if gate.permits(request.headers()) {
        return next.run(request).await;
    }
    GatewayError::Unauthorized("Invalid API key").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(key: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(key) = key {
            headers.insert(X_API_KEY, HeaderValue::from_static(key));
        }
        headers
    }

    #[test]
    fn test_disabled_gate_permits_everything() {
        let gate = AuthGate::new(None);
        assert!(!gate.is_enabled());
        assert!(gate.permits(&headers(None)));
        assert!(gate.permits(&headers(Some("anything"))));
    }

    #[test]
    fn test_enabled_gate() {
        let gate = AuthGate::new(Some("secret"));
        assert!(gate.permits(&headers(Some("secret"))));
        assert!(!gate.permits(&headers(None)));
        assert!(!gate.permits(&headers(Some("Secret"))));
        assert!(!gate.permits(&headers(Some("secret2"))));
        assert!(!gate.permits(&headers(Some(""))));
    }
}
