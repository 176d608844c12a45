//! Request correlation.
//!
//! # Responsibilities
//! - Name the correlation header
//! - Read the id assigned by `SetRequestIdLayer` (caller-supplied or UUID v4)
//! - Treat an empty caller-supplied id as absent
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - A caller-supplied id is kept as-is and echoed back

use std::convert::Infallible;

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, HeaderName, Request},
};

pub const X_REQUEST_ID: &str = "x-request-id";

pub fn x_request_id() -> HeaderName {
    HeaderName::from_static(X_REQUEST_ID)
}

/// Access to the correlation id of a request.
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&str>;
}

impl RequestIdExt for HeaderMap {
    fn request_id(&self) -> Option<&str> {
        self.get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
    }
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> Option<&str> {
        self.headers().request_id()
    }
}

/// Remove a blank `x-request-id` so `SetRequestIdLayer` generates one.
pub async fn drop_blank_request_id(mut request: Request<Body>) -> Request<Body> {
    let blank = request
        .headers()
        .get(X_REQUEST_ID)
        .is_some_and(|v| v.as_bytes().iter().all(u8::is_ascii_whitespace));
    if blank {
        request.headers_mut().remove(X_REQUEST_ID);
    }
    request
}

/// Extractor for the correlation id, forwarded to upstream calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestId(pub Option<String>);

impl<S: Send + Sync> FromRequestParts<S> for RequestId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestId(parts.headers.request_id().map(str::to_string)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_from_header() {
        let req = Request::builder()
            .header(X_REQUEST_ID, "abc-123")
            .body(Body::empty())
            .unwrap();
        assert_eq!(req.request_id(), Some("abc-123"));

        let req = Request::builder()
            .header(X_REQUEST_ID, "")
            .body(Body::empty())
            .unwrap();
        assert_eq!(req.request_id(), None);
    }

    #[tokio::test]
    async fn test_blank_request_id_is_dropped() {
        let req = Request::builder()
            .header(X_REQUEST_ID, "")
            .body(Body::empty())
            .unwrap();
        assert!(!drop_blank_request_id(req).await.headers().contains_key(X_REQUEST_ID));

        let req = Request::builder()
            .header(X_REQUEST_ID, "abc-123")
            .body(Body::empty())
            .unwrap();
        assert_eq!(drop_blank_request_id(req).await.request_id(), Some("abc-123"));
    }
}
