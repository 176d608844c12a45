//! Product service client.

use url::Url;

use crate::config::CatalogConfig;
use crate::contract::{decode_products, Product};
use crate::upstream::{Upstream, UpstreamClient, UpstreamError, UpstreamResult};

/// Fetches the product list from the catalog service.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: UpstreamClient,
    products_url: Option<Url>,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig, client: UpstreamClient) -> Self {
        Self {
            client,
            products_url: config.products_url.clone(),
        }
    }

    /// Target for a request: the caller's override, else the configured URL.
    pub fn resolve(&self, endpoint: Option<&Url>) -> UpstreamResult<Url> {
        endpoint
            .or(self.products_url.as_ref())
            .cloned()
            .ok_or(UpstreamError::MissingEndpoint("PRODUCTS_API_URL"))
    }

    /// GET the product list and decode it as `Product[]`.
    pub async fn fetch_products(
        &self,
        endpoint: Option<&Url>,
        request_id: Option<&str>,
    ) -> UpstreamResult<Vec<Product>> {
        let url = self.resolve(endpoint)?;
        let request = self.client.http().get(url);
        let body = self
            .client
            .fetch_json(Upstream::Catalog, request, request_id)
            .await?;

        decode_products(body).map_err(|source| UpstreamError::Contract {
            upstream: Upstream::Catalog,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeoutConfig;

    fn client(products_url: Option<&str>) -> CatalogClient {
        let config = CatalogConfig {
            products_url: products_url.map(|u| Url::parse(u).unwrap()),
        };
        CatalogClient::new(&config, UpstreamClient::new(&TimeoutConfig::default()).unwrap())
    }

    #[test]
    fn test_override_wins() {
        let catalog = client(Some("http://catalog.internal/products"));
        let override_url = Url::parse("https://staging.example.com/products").unwrap();

        assert_eq!(catalog.resolve(Some(&override_url)).unwrap(), override_url);
        assert_eq!(
            catalog.resolve(None).unwrap().as_str(),
            "http://catalog.internal/products"
        );
    }

    #[tokio::test]
    async fn test_missing_url_makes_no_call() {
        let err = client(None).fetch_products(None, None).await.unwrap_err();
        assert!(matches!(err, UpstreamError::MissingEndpoint("PRODUCTS_API_URL")));
    }
}
