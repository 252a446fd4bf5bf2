//! Shopify stores searched through the `search/suggest.json` endpoint

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::client::HttpClient;
use crate::error::Result;
use crate::extract::{absolutize, format_price, json_image, json_text};
use crate::models::FabricResult;
use crate::traits::{FabricScraper, build_search_url};

/// Any Shopify storefront with predictive search enabled
pub struct ShopifySuggestStore {
    client: HttpClient,
    base_url: String,
    source: &'static str,
}

impl ShopifySuggestStore {
    pub fn new(client: HttpClient, base_url: impl Into<String>, source: &'static str) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            source,
        }
    }

    /// Fabricville, Canadian retail fabric chain.
    pub fn fabricville(client: HttpClient) -> Self {
        Self::new(client, "https://fabricville.com", "fabricville")
    }

    /// Spool of Thread, Vancouver; sells by the half-yard.
    pub fn spool_of_thread(client: HttpClient) -> Self {
        Self::new(client, "https://spoolofthread.com", "spool_of_thread")
    }

    fn search_url(&self, query: &str, max_results: usize) -> String {
        let pattern = format!(
            "{}/search/suggest.json?q={{query}}&resources[type]=product&resources[limit]={}",
            self.base_url, max_results
        );
        build_search_url(&pattern, query)
    }
}

#[async_trait]
impl FabricScraper for ShopifySuggestStore {
    fn source(&self) -> &'static str {
        self.source
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<FabricResult>> {
        info!("Searching {} for '{}'", self.source, query);

        let data: Value = self.client.get_json(&self.search_url(query, max_results)).await?;
        let mut results = parse_suggest(&data, &self.base_url, self.source);
        results.truncate(max_results);

        info!("Found {} results on {}", results.len(), self.source);
        Ok(results)
    }
}

/// Map `resources.results.products` to fabric results, skipping unusable items.
pub(crate) fn parse_suggest(data: &Value, base_url: &str, source: &str) -> Vec<FabricResult> {
    let products = data
        .pointer("/resources/results/products")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    products
        .iter()
        .filter_map(|product| {
            let title = json_text(product.get("title"));
            let url = json_text(product.get("url"));
            let (Some(title), Some(url)) = (title, url) else {
                debug!("{}: suggest item without title or url, skipping", source);
                return None;
            };

            Some(FabricResult {
                source: source.to_string(),
                title,
                price: json_text(product.get("price")).map(|p| format_price(&p)),
                image_url: json_image(product.get("image")).map(|i| absolutize(base_url, &i)),
                url: absolutize(base_url, &url),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload() -> Value {
        json!({
            "resources": {"results": {"products": [
                {
                    "title": "Cotton Poplin Fabric",
                    "price": "12.99",
                    "image": "https://cdn.shopify.com/s/files/1/cotton.jpg",
                    "url": "/products/cotton-poplin?_pos=1"
                },
                {"title": "Denim", "price": "$19.99", "url": "https://fabricville.com/products/denim"},
                {"title": "Mystery", "price": "N/A", "url": "/products/mystery"},
                {"price": "4.00", "url": "/products/untitled"},
                "not an object"
            ]}}
        })
    }

    #[test]
    fn parse_normalizes_price_and_urls() {
        let results = parse_suggest(&payload(), "https://fabricville.com", "fabricville");

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].price.as_deref(), Some("CAD $12.99"));
        assert_eq!(results[0].url, "https://fabricville.com/products/cotton-poplin?_pos=1");
        assert_eq!(results[1].price.as_deref(), Some("$19.99"));
        assert_eq!(results[2].price.as_deref(), Some("N/A"));
        assert_eq!(results[1].image_url, None);
    }

    #[test]
    fn parse_tolerates_missing_resources() {
        assert!(parse_suggest(&json!({}), "https://x.com", "fabricville").is_empty());
        assert!(parse_suggest(&json!({"resources": {"results": {}}}), "https://x.com", "x").is_empty());
    }

    #[tokio::test]
    async fn search_sends_limit_and_truncates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/suggest.json"))
            .and(query_param("q", "cotton"))
            .and(query_param("resources[type]", "product"))
            .and(query_param("resources[limit]", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload()))
            .mount(&server)
            .await;

        let client = HttpClient::new("test", Duration::from_secs(5)).unwrap();
        let store = ShopifySuggestStore::new(client, server.uri(), "fabricville");
        let results = store.search("cotton", 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert!(results[0].url.starts_with(&server.uri()));
    }
}
