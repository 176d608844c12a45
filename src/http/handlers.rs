//! Route handlers.
//!
//! Each content route runs the same pipeline:
//! query contract → upstream → response contract → cache directives.
//! The response contract is enforced where the upstream body is decoded.

use axum::{
    extract::{RawQuery, State},
    http::{Method, Uri},
    Json,
};

use crate::cms::FetchOptions;
use crate::contract::{
    ContentQuery, HealthResponse, HeroBannerContent, HomeContent, HomeQuery, Product,
};
use crate::error::{GatewayError, GatewayResult};
use crate::http::request::RequestId;
use crate::http::response::Cached;
use crate::http::server::AppState;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

pub async fn hero(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    RawQuery(query): RawQuery,
) -> GatewayResult<Cached<HeroBannerContent>> {
    let query = ContentQuery::parse(query.as_deref())?;
    let options = FetchOptions {
        endpoint: query.endpoint,
        request_id,
    };

    let content = state.cms.fetch_hero(&options).await?;
    Ok(Cached::new(content, query.revalidate))
}

pub async fn home(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    RawQuery(query): RawQuery,
) -> GatewayResult<Cached<HomeContent>> {
    let query = HomeQuery::parse(query.as_deref())?;
    if let Some(endpoint) = &query.endpoint {
        tracing::debug!(%endpoint, "Ignoring endpoint override for home page query");
    }
    let options = FetchOptions {
        endpoint: None,
        request_id,
    };

    let content = state.cms.fetch_home(&query.path, &options).await?;
    Ok(Cached::new(content, query.revalidate))
}

pub async fn products(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    RawQuery(query): RawQuery,
) -> GatewayResult<Cached<Vec<Product>>> {
    let query = ContentQuery::parse(query.as_deref())?;

    let products = state
        .catalog
        .fetch_products(query.endpoint.as_ref(), request_id.as_deref())
        .await?;

    tracing::debug!(count = products.len(), "Products fetched");
    Ok(Cached::new(products, query.revalidate))
}

pub async fn not_found(method: Method, uri: Uri) -> GatewayError {
    GatewayError::NotFound(format!("{} {}", method, uri.path()))
}
