//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (request id, tracing, panic backstop, deadline,
//!   security headers, rate limit, auth gate, CORS, metrics)
//! - Bind server to listener and shut down gracefully

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::catalog::CatalogClient;
use crate::cms::CmsAdapter;
use crate::config::GatewayConfig;
use crate::error::handle_panic;
use crate::http::handlers;
use crate::http::middleware::{auth_gate_middleware, request_timeout_middleware, AuthGate};
use crate::http::request::{drop_blank_request_id, x_request_id};
use crate::lifecycle::ShutdownListener;
use crate::observability::{logging, metrics};
use crate::security::headers::{cors_layer, security_headers_middleware};
use crate::security::rate_limit::{rate_limit_middleware, RateLimiter};
use crate::upstream::{UpstreamClient, UpstreamResult};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub cms: Arc<CmsAdapter>,
    pub catalog: Arc<CatalogClient>,
}

impl AppState {
    /// Build the upstream adapters from configuration.
    pub fn new(config: Arc<GatewayConfig>) -> UpstreamResult<Self> {
        let client = UpstreamClient::new(&config.timeouts)?;
        let cms = Arc::new(CmsAdapter::new(&config.cms, client.clone()));
        let catalog = Arc::new(CatalogClient::new(&config.catalog, client));
        Ok(Self {
            config,
            cms,
            catalog,
        })
    }
}

/// HTTP server for the content gateway.
pub struct HttpServer {
    router: Router,
    config: Arc<GatewayConfig>,
    limiter: Option<Arc<RateLimiter>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> UpstreamResult<Self> {
        let config = Arc::new(config);
        let state = AppState::new(config.clone())?;
        let limiter = config
            .rate_limit
            .enabled
            .then(|| Arc::new(RateLimiter::from_config(&config.rate_limit)));

        let router = Self::build_router(&config, state, limiter.clone());
        Ok(Self {
            router,
            config,
            limiter,
        })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers added later wrap the earlier ones, so the request passes
    /// blank id removal → request id → trace → panic backstop → deadline →
    /// security headers → rate limit → auth gate → CORS → metrics → handler.
    /// CORS preflights are therefore subject to the auth gate.
    fn build_router(
        config: &GatewayConfig,
        state: AppState,
        limiter: Option<Arc<RateLimiter>>,
    ) -> Router {
        let mut router = Router::new()
            .route("/health", get(handlers::health))
            .route("/content/hero", get(handlers::hero))
            .route("/content/home", get(handlers::home))
            .route("/content/products", get(handlers::products))
            .fallback(handlers::not_found)
            .with_state(state)
            .layer(middleware::from_fn(metrics::track_requests))
            .layer(cors_layer(&config.security.cors_origin))
            .layer(middleware::from_fn_with_state(
                AuthGate::new(config.security.api_key.as_deref()),
                auth_gate_middleware,
            ));

        if let Some(limiter) = limiter {
            router = router.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
        }
        if config.security.enable_headers {
            router = router.layer(middleware::from_fn(security_headers_middleware));
        }

        router
            .layer(middleware::from_fn_with_state(
                Duration::from_secs(config.timeouts.request_secs),
                request_timeout_middleware,
            ))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(x_request_id(), MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(logging::request_span))
                    .layer(PropagateRequestIdLayer::new(x_request_id())),
            )
            .layer(middleware::map_request(drop_blank_request_id))
    }

    /// Router with every layer applied; usable without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownListener,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            cms_mode = ?self.config.cms.mode,
            auth = self.config.security.api_key.is_some(),
            "HTTP server starting"
        );

        if let Some(limiter) = self.limiter.clone() {
            let mut stop = shutdown.clone();
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(limiter.window());
                loop {
                    tokio::select! {
                        _ = ticker.tick() => limiter.gc(),
                        _ = stop.triggered() => break,
                    }
                }
            });
        }

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.triggered().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
