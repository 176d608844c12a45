//! Request middleware owned by the HTTP layer.

pub mod auth;
pub mod timeout;

pub use auth::{auth_gate_middleware, AuthGate, X_API_KEY};
pub use timeout::request_timeout_middleware;
