//! Content Gateway (v1)
//!
//! Authenticates callers, validates queries, fetches content from a headless
//! CMS or the product catalog, validates the result and replies with cache
//! directives for downstream caches.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────────┐
//!                    │                   CONTENT GATEWAY                     │
//!                    │                                                       │
//!  Client Request    │  ┌───────────┐   ┌──────────┐   ┌───────────┐         │
//!  ──────────────────┼─▶│ request id│──▶│rate limit│──▶│ auth gate │         │
//!                    │  │ + tracing │   │  + CORS  │   │ x-api-key │         │
//!                    │  └───────────┘   └──────────┘   └─────┬─────┘         │
//!                    │                                       ▼               │
//!                    │  ┌───────────┐   ┌──────────┐   ┌───────────┐         │
//!                    │  │  query    │◀──│ handlers │──▶│ cms       │─────────┼──▶ CMS
//!                    │  │ contract  │   │          │   │ catalog   │─────────┼──▶ Catalog
//!                    │  └───────────┘   └────┬─────┘   └───────────┘         │
//!                    │                       ▼                               │
//!  Client Response   │  ┌───────────┐   ┌──────────┐                         │
//!  ◀─────────────────┼──│  cache    │◀──│ response │                         │
//!                    │  │directives │   │ contract │                         │
//!                    │  └───────────┘   └──────────┘                         │
//!                    └──────────────────────────────────────────────────────┘
//! ```

use content_gateway::config::{load_from_env, ConfigError};
use content_gateway::lifecycle::startup;
use content_gateway::observability::logging::init_logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match load_from_env() {
        Ok(config) => config,
        Err(ConfigError::Validation(errors)) => {
            eprintln!("content-gateway: invalid configuration");
            for error in errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address(),
        cms_mode = ?config.cms.mode,
        rate_limit = config.rate_limit.enabled,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
