//! CMS adapter: hero banner and home page queries.
//!
//! # Responsibilities
//! - Resolve the endpoint (per-call override or configured)
//! - Issue the request in the configured access mode
//! - Attach the configured `Authorization` header
//! - Parse the upstream shape into the outbound content type

use reqwest::header::AUTHORIZATION;
use reqwest::RequestBuilder;
use url::Url;

use crate::cms::schema::{self, GraphqlRequest};
use crate::config::{CmsConfig, CmsMode};
use crate::contract::{HeroBannerContent, HomeContent};
use crate::upstream::{Upstream, UpstreamClient, UpstreamError, UpstreamResult};

/// Per-call options for CMS queries.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Replaces the configured hero endpoint for this call. The home query
    /// always targets the configured base endpoint.
    pub endpoint: Option<Url>,
    /// Correlation id forwarded upstream.
    pub request_id: Option<String>,
}

/// How `fetch_home` reaches the CMS. Chosen once when the adapter is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeStrategy {
    /// GET on the endpoint with `path` as a query parameter.
    PersistedGet,
    /// POST of the home page GraphQL document with `path` as a variable.
    GraphqlPost,
}

impl From<CmsMode> for HomeStrategy {
    fn from(mode: CmsMode) -> Self {
        match mode {
            CmsMode::PersistedGet => HomeStrategy::PersistedGet,
            CmsMode::GraphqlPost => HomeStrategy::GraphqlPost,
        }
    }
}

impl HomeStrategy {
    /// Build the upstream request for `path`.
    pub fn request(self, http: &reqwest::Client, endpoint: &Url, path: &str) -> RequestBuilder {
        match self {
            HomeStrategy::PersistedGet => {
                let mut url = endpoint.clone();
                set_query_param(&mut url, "path", path);
                http.get(url)
            }
            HomeStrategy::GraphqlPost => http
                .post(endpoint.clone())
                .json(&GraphqlRequest::home_page(path)),
        }
    }
}

/// Replace (or add) one query parameter, keeping the others.
fn set_query_param(url: &mut Url, key: &str, value: &str) {
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut pairs = url.query_pairs_mut();
    pairs.clear();
    pairs.extend_pairs(retained);
    pairs.append_pair(key, value);
}

/// Typed access to the headless CMS.
#[derive(Debug, Clone)]
pub struct CmsAdapter {
    client: UpstreamClient,
    endpoint: Option<Url>,
    hero_endpoint: Option<Url>,
    auth_header: Option<String>,
    home: HomeStrategy,
}

impl CmsAdapter {
    pub fn new(config: &CmsConfig, client: UpstreamClient) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            hero_endpoint: config.hero_endpoint.clone(),
            auth_header: config.auth_header.clone(),
            home: config.mode.into(),
        }
    }

    pub fn strategy(&self) -> HomeStrategy {
        self.home
    }

    /// Fetch the hero banner through its persisted query (always GET).
    pub async fn fetch_hero(&self, options: &FetchOptions) -> UpstreamResult<HeroBannerContent> {
        let endpoint = options
            .endpoint
            .as_ref()
            .or(self.hero_endpoint.as_ref())
            .ok_or(UpstreamError::MissingEndpoint(
                "CMS_HERO_ENDPOINT for hero banner query",
            ))?;

        let request = self.authorize(self.client.http().get(endpoint.clone()));
        let body = self
            .client
            .fetch_json(Upstream::Cms, request, options.request_id.as_deref())
            .await?;

        schema::parse_hero(body).map_err(|source| UpstreamError::Contract {
            upstream: Upstream::Cms,
            source,
        })
    }

    /// Fetch the home page content fragment at `path` from the configured
    /// base endpoint. `options.endpoint` is not consulted.
    pub async fn fetch_home(&self, path: &str, options: &FetchOptions) -> UpstreamResult<HomeContent> {
        let endpoint = self
            .endpoint
            .as_ref()
            .ok_or(UpstreamError::MissingEndpoint(
                "CMS_ENDPOINT for home page query",
            ))?;

        tracing::debug!(path, strategy = ?self.home, "Fetching home page");
        let request = self.authorize(self.home.request(self.client.http(), endpoint, path));
        let body = self
            .client
            .fetch_json(Upstream::Cms, request, options.request_id.as_deref())
            .await?;

        schema::parse_home(body).map_err(|source| UpstreamError::Contract {
            upstream: Upstream::Cms,
            source,
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_header {
            Some(value) => request.header(AUTHORIZATION, value.as_str()),
            None => request,
        }
    }
}
