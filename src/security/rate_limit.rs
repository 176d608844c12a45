//! Fixed-window request rate limiting per client.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;

use crate::config::RateLimitConfig;
use crate::error::GatewayError;
use crate::observability::metrics;

/// Counter for one client within the current window.
struct Window {
    count: u64,
    started: Instant,
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Limited { retry_after: Duration },
}

/// Per-client fixed-window limiter: `max_requests` per `window`.
pub struct RateLimiter {
    clients: DashMap<String, Window>,
    max_requests: u64,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u64, window: Duration) -> Self {
        Self {
            clients: DashMap::new(),
            max_requests,
            window,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, Duration::from_secs(config.window_secs))
    }

    /// Count a request from `client` and decide whether it may proceed.
    pub fn check(&self, client: &str) -> Decision {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> Decision {
        let mut entry = self
            .clients
            .entry(client.to_string())
            .or_insert_with(|| Window {
                count: 0,
                started: now,
            });

        if now.duration_since(entry.started) >= self.window {
            entry.count = 0;
            entry.started = now;
        }

        if entry.count < self.max_requests {
            entry.count += 1;
            Decision::Allowed
        } else {
            let elapsed = now.duration_since(entry.started);
            Decision::Limited {
                retry_after: self.window.saturating_sub(elapsed),
            }
        }
    }

    /// Drop windows that ended long ago to keep memory bounded.
    pub fn gc(&self) {
        let now = Instant::now();
        self.clients
            .retain(|_, window| now.duration_since(window.started) < self.window * 2);
    }

    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

/// Client key: peer IP when the server recorded it, else a shared bucket.
fn client_key(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "local".to_string())
}

pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = client_key(&request);
    match limiter.check(&client) {
        Decision::Allowed => next.run(request).await,
        Decision::Limited { retry_after } => {
            metrics::record_rate_limited();
            GatewayError::TooManyRequests {
                client,
                retry_after_secs: retry_after.as_secs().max(1),
            }
            .into_response()
        }
    }
}
