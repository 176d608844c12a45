//! Response helpers.
//!
//! # Responsibilities
//! - Attach cache directives to successful content replies
//!
//! # Design Decisions
//! - Directives are only ever set on 2xx replies; errors carry none
//! - Shared-cache max age and stale-while-revalidate window are equal

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::contract::RevalidateSeconds;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// `Cache-Control` value for a revalidation interval.
pub fn cache_directive(revalidate: RevalidateSeconds) -> String {
    let seconds = revalidate.get();
    format!("s-maxage={}, stale-while-revalidate={}", seconds, seconds)
}

/// A validated payload replied with 200 and cache directives.
#[derive(Debug)]
pub struct Cached<T> {
    pub payload: T,
    pub revalidate: RevalidateSeconds,
}

impl<T> Cached<T> {
    pub fn new(payload: T, revalidate: RevalidateSeconds) -> Self {
        Self {
            payload,
            revalidate,
        }
    }
}

impl<T: Serialize> IntoResponse for Cached<T> {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [
                (header::CACHE_CONTROL, cache_directive(self.revalidate)),
                (header::CONTENT_TYPE, JSON_CONTENT_TYPE.to_string()),
            ],
            Json(self.payload),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_directive_uses_same_value_twice() {
        for n in [1u32, 60, 86_400, u32::MAX] {
            let directive = cache_directive(RevalidateSeconds::new(n).unwrap());
            assert_eq!(directive, format!("s-maxage={n}, stale-while-revalidate={n}"));
        }
    }

    #[test]
    fn test_cached_response_headers() {
        let response =
            Cached::new(json!({ "title": "t" }), RevalidateSeconds::new(15).unwrap()).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "s-maxage=15, stale-while-revalidate=15"
        );
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), JSON_CONTENT_TYPE);
    }
}
