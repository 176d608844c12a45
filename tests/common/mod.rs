//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use content_gateway::{GatewayConfig, HttpServer};
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;

/// What a mock upstream received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

/// A programmable upstream listening on an ephemeral port.
pub struct MockUpstream {
    pub addr: SocketAddr,
    hits: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockUpstream {
    pub fn url(&self, path: &str) -> Url {
        Url::parse(&format!("http://{}{}", self.addr, path)).unwrap()
    }

    pub fn hits(&self) -> Vec<RecordedRequest> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hit_count(&self) -> usize {
        self.hits.lock().unwrap().len()
    }
}

/// Start an upstream whose reply is computed per request.
pub async fn start_programmable_upstream<F, Fut>(respond: F) -> MockUpstream
where
    F: Fn(RecordedRequest) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = (StatusCode, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(Mutex::new(Vec::new()));
    let recorded = hits.clone();

    let app = Router::new().fallback(move |request: Request<Body>| {
        let respond = respond.clone();
        let recorded = recorded.clone();
        async move {
            let (parts, body) = request.into_parts();
            let body = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
            let request = RecordedRequest {
                method: parts.method.clone(),
                path: parts.uri.path().to_string(),
                query: parts.uri.query().map(str::to_string),
                headers: parts.headers.clone(),
                body: String::from_utf8_lossy(&body).into_owned(),
            };
            recorded.lock().unwrap().push(request.clone());

            let (status, body) = respond(request).await;
            (status, [(header::CONTENT_TYPE, "application/json")], body)
        }
    });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, hits }
}

/// Start an upstream that always answers `status` with `body`.
pub async fn start_json_upstream(status: StatusCode, body: Value) -> MockUpstream {
    start_text_upstream(status, body.to_string()).await
}

/// Start an upstream that always answers `status` with a raw text body.
pub async fn start_text_upstream(status: StatusCode, body: impl Into<String>) -> MockUpstream {
    let body = body.into();
    start_programmable_upstream(move |_| {
        let body = body.clone();
        async move { (status, body) }
    })
    .await
}

/// A URL nothing is listening on.
pub async fn unreachable_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{}/graphql/execute.json/site/hero", addr)).unwrap()
}

/// Defaults suitable for tests: no rate limit, short timeouts.
pub fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.rate_limit.enabled = false;
    config.timeouts.upstream_secs = 5;
    config.timeouts.request_secs = 10;
    config
}

pub fn router(config: GatewayConfig) -> Router {
    HttpServer::new(config).unwrap().router()
}

/// Decoded reply from the gateway.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(router: &Router, uri: &str) -> TestResponse {
    send(router, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn get_with(router: &Router, uri: &str, headers: &[(&str, &str)]) -> TestResponse {
    let mut request = Request::get(uri);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    send(router, request.body(Body::empty()).unwrap()).await
}

/// Percent-encode a URL for use as a query parameter value.
pub fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
