//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (correlation id)
//!     → middleware/ (auth gate)
//!     → handlers.rs (query contract → upstream → response contract)
//!     → response.rs (cache directives)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestId, RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
