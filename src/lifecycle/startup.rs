//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Build the server from validated configuration
//! - Bind the listener and serve until a termination signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::spawn_signal_handler;
use crate::observability::metrics;
use crate::upstream::UpstreamError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("metrics exporter failed: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("listener failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Serve the gateway until SIGINT/SIGTERM.
pub async fn run(config: GatewayConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let bind_address = config.listener.bind_address();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.listener();
    spawn_signal_handler(shutdown);

    server.run(listener, server_shutdown).await?;
    Ok(())
}
