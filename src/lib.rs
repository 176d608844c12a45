//! Content delivery gateway between client applications, a headless CMS and
//! a product catalog service.

pub mod catalog;
pub mod cms;
pub mod config;
pub mod contract;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod upstream;

pub use config::GatewayConfig;
pub use error::{ErrorEnvelope, ErrorKind, GatewayError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
