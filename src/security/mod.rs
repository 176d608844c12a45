//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → headers.rs (hardening headers on the way out)
//!     → rate_limit.rs (per-client fixed window)
//!     → http::middleware::auth (shared secret)
//!     → headers.rs (CORS preflight and response headers)
//!     → Route handler
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any security check failure
//! - No trust in client input

pub mod headers;
pub mod rate_limit;

pub use rate_limit::RateLimiter;
