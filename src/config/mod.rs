//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env file (optional)
//!     → GATEWAY_CONFIG TOML file (optional base layer)
//!     → loader.rs (environment overlay, empty values = unset)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde / FromStr) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_from_env, load_from_vars, ConfigError};
pub use schema::GatewayConfig;
pub use schema::{
    CatalogConfig, CmsConfig, CmsMode, ListenerConfig, LogFormat, ObservabilityConfig,
    RateLimitConfig, SecurityConfig, TimeoutConfig,
};
