//! Shared HTTP client for upstream calls.
//!
//! # Responsibilities
//! - Own the pooled reqwest client with connect and total timeouts
//! - Send one request, classify the outcome, decode the JSON body
//! - Propagate the caller's request id
//! - Record per-upstream metrics
//!
//! # Design Decisions
//! - Single attempt per call; no retries
//! - Timeout errors are distinct from other transport errors
//! - Non-2xx bodies are read as text and kept (truncated) for the error message

use std::time::{Duration, Instant};

use reqwest::RequestBuilder;
use serde_json::Value;

use crate::config::TimeoutConfig;
use crate::contract::{ContractError, Violation};
use crate::http::request::X_REQUEST_ID;
use crate::observability::metrics;
use crate::upstream::types::{truncate_body, Upstream, UpstreamError, UpstreamResult};

/// Pooled HTTP client shared by every upstream adapter.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    timeout_secs: u64,
}

impl UpstreamClient {
    /// Build the client from the configured timeouts.
    pub fn new(timeouts: &TimeoutConfig) -> UpstreamResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .user_agent(concat!("content-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(UpstreamError::Client)?;

        Ok(Self {
            http,
            timeout_secs: timeouts.upstream_secs,
        })
    }

    /// Underlying client, for building requests.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Send `request` and decode a 2xx JSON body.
    pub async fn fetch_json(
        &self,
        upstream: Upstream,
        request: RequestBuilder,
        request_id: Option<&str>,
    ) -> UpstreamResult<Value> {
        let request = match request_id {
            Some(id) => request.header(X_REQUEST_ID, id),
            None => request,
        };

        let start = Instant::now();
        let result = self.execute(upstream, request).await;
        metrics::record_upstream(upstream.as_str(), outcome(&result), start);

        if let Err(e) = &result {
            tracing::warn!(
                upstream = upstream.as_str(),
                request_id = request_id.unwrap_or("-"),
                error = %e,
                "Upstream call failed"
            );
        }
        result
    }

    async fn execute(&self, upstream: Upstream, request: RequestBuilder) -> UpstreamResult<Value> {
        let response = request
            .send()
            .await
            .map_err(|e| self.classify(upstream, e))?;

        let status = response.status();
        tracing::debug!(
            upstream = upstream.as_str(),
            url = %response.url(),
            status = status.as_u16(),
            "Upstream responded"
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                upstream,
                status,
                body: truncate_body(body),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.classify(upstream, e))?;

        serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Contract {
            upstream,
            source: ContractError {
                subject: "response body",
                violations: vec![Violation::new("$", format!("invalid JSON: {}", e))],
            },
        })
    }

    fn classify(&self, upstream: Upstream, error: reqwest::Error) -> UpstreamError {
        if error.is_timeout() {
            UpstreamError::Timeout {
                upstream,
                secs: self.timeout_secs,
            }
        } else {
            UpstreamError::Transport {
                upstream,
                source: error,
            }
        }
    }
}

fn outcome(result: &UpstreamResult<Value>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(UpstreamError::Status { .. }) => "status",
        Err(UpstreamError::Timeout { .. }) => "timeout",
        Err(UpstreamError::Contract { .. }) => "invalid_body",
        Err(_) => "transport",
    }
}
