//! Upstream access subsystem.
//!
//! # Data Flow
//! ```text
//! Adapter (cms, catalog) builds a reqwest::RequestBuilder
//!     → client.rs (attach request id, send, classify status)
//!     → serde_json::Value on 2xx
//!     → adapter decodes Value into its typed contract
//! ```
//!
//! # Design Decisions
//! - One pooled client for all upstreams
//! - No retry or backoff: one failure fails the request
//! - Dropping the future (client disconnect) aborts the call

pub mod client;
pub mod types;

pub use client::UpstreamClient;
pub use types::{Upstream, UpstreamError, UpstreamResult};
