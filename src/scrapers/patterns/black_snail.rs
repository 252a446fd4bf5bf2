//! Black Snail Patterns, read through Shopify's public product JSON

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::client::HttpClient;
use crate::error::{Error, Result};
use crate::extract::{absolutize, json_text};
use crate::models::{PatternDetail, PatternSearchResult, UNKNOWN_TITLE};
use crate::traits::{PatternDetailScraper, PatternScraper};

pub const SOURCE: &str = "black_snail";
pub const BRAND: &str = "Black Snail Patterns";
const BASE_URL: &str = "https://blacksnailpatterns.com";
const CATALOG_PAGE_SIZE: &str = "250";

/// Era-based collection handles for browsing
pub const COLLECTIONS: [(&str, &str); 9] = [
    ("free", "gratis-schnittmuster"),
    ("1700-1790", "pdf-women-1700-1790"),
    ("1790-1820", "pdf-women-1790-1820"),
    ("1820-1860", "pdf-women-1820-1860"),
    ("1860-1910", "pdf-women-1860-1910"),
    ("men-1700-1820", "pdf-men-1700-1820"),
    ("men-1820-1860", "pdf-men-1820-1860"),
    ("men-1860-1910", "pdf-men-1860-1910"),
    ("children", "pdf-kinder"),
];

#[derive(Debug, Deserialize)]
struct ProductsPage {
    #[serde(default)]
    products: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ProductPage {
    product: Option<Value>,
}

pub struct BlackSnail {
    client: HttpClient,
    base_url: String,
}

impl BlackSnail {
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Every pattern in one of the era [`COLLECTIONS`].
    pub async fn list_collection(&self, key: &str) -> Result<Vec<PatternSearchResult>> {
        let Some((_, handle)) = COLLECTIONS.iter().find(|(k, _)| *k == key) else {
            return Err(Error::UnknownSource {
                kind: "collection",
                key: key.to_string(),
                valid: COLLECTIONS.iter().map(|(k, _)| *k).collect(),
            });
        };

        info!("Listing {} collection '{}'", SOURCE, handle);
        let url = format!("{}/collections/{}/products.json", self.base_url, handle);
        let page: ProductsPage = self.client.get_json(&url).await?;

        Ok(page
            .products
            .iter()
            .filter_map(|p| to_search_result(p, &self.base_url))
            .collect())
    }
}

#[async_trait]
impl PatternScraper for BlackSnail {
    fn source(&self) -> &'static str {
        SOURCE
    }

    /// The store has no server-side search: the catalog is fetched and
    /// filtered on title or tag.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<PatternSearchResult>> {
        info!("Searching {} catalog for '{}'", SOURCE, query);

        let url = format!("{}/products.json", self.base_url);
        let page: ProductsPage = self
            .client
            .get_json_with_query(&url, &[("limit", CATALOG_PAGE_SIZE)])
            .await?;

        Ok(filter_catalog(&page.products, query, &self.base_url, max_results))
    }

    fn detail_scraper(&self) -> Option<&dyn PatternDetailScraper> {
        Some(self)
    }
}

#[async_trait]
impl PatternDetailScraper for BlackSnail {
    fn source(&self) -> &'static str {
        SOURCE
    }

    async fn detail(&self, url: &str) -> Result<PatternDetail> {
        let handle = handle_from_url(url);
        info!("Fetching {} product '{}'", SOURCE, handle);

        let endpoint = format!("{}/products/{}.json", self.base_url, handle);
        let page: ProductPage = self.client.get_json(&endpoint).await?;

        let Some(product) = page.product.filter(Value::is_object) else {
            debug!("{}: no product in response for {}", SOURCE, url);
            return Ok(PatternDetail::minimal(SOURCE, UNKNOWN_TITLE, url).with_brand(BRAND));
        };

        let mut detail = PatternDetail::minimal(
            SOURCE,
            json_text(product.get("title")).unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            url,
        )
        .with_brand(BRAND);
        detail.price = first_variant_price(&product);
        detail.image_url = first_image(&product).map(|src| absolutize(&self.base_url, &src));

        Ok(detail)
    }
}

pub(crate) fn filter_catalog(
    products: &[Value],
    query: &str,
    base_url: &str,
    max_results: usize,
) -> Vec<PatternSearchResult> {
    let query = query.trim().to_lowercase();

    products
        .iter()
        .filter(|p| matches_query(p, &query))
        .filter_map(|p| to_search_result(p, base_url))
        .take(max_results)
        .collect()
}

fn matches_query(product: &Value, query: &str) -> bool {
    let title = json_text(product.get("title")).unwrap_or_default();
    title.to_lowercase().contains(query) || tags(product).iter().any(|t| t.to_lowercase().contains(query))
}

/// `tags` is a list in `products.json` but a comma-joined string in some themes.
fn tags(product: &Value) -> Vec<String> {
    match product.get("tags") {
        Some(Value::Array(list)) => list.iter().filter_map(|t| json_text(Some(t))).collect(),
        Some(Value::String(joined)) => joined.split(',').map(|t| t.trim().to_string()).collect(),
        _ => Vec::new(),
    }
}

fn to_search_result(product: &Value, base_url: &str) -> Option<PatternSearchResult> {
    let title = json_text(product.get("title"))?;
    let handle = json_text(product.get("handle"))?;

    Some(PatternSearchResult {
        source: SOURCE.to_string(),
        title,
        pattern_number: None,
        brand: Some(BRAND.to_string()),
        difficulty: None,
        price: first_variant_price(product),
        image_url: first_image(product).map(|src| absolutize(base_url, &src)),
        url: format!("{base_url}/products/{handle}"),
    })
}

fn first_variant_price(product: &Value) -> Option<String> {
    json_text(product.pointer("/variants/0/price"))
}

fn first_image(product: &Value) -> Option<String> {
    json_text(product.pointer("/images/0/src"))
}

/// `https://blacksnailpatterns.com/products/my-pattern/?variant=1` → `my-pattern`
pub fn handle_from_url(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let path = path.trim_end_matches('/');
    match path.rsplit_once("/products/") {
        Some((_, rest)) => rest.split('/').next().unwrap_or(rest),
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn catalog() -> Value {
        json!({"products": [
            {
                "title": "Regency Spencer Jacket",
                "handle": "regency-spencer",
                "tags": ["1790-1820", "Jacket"],
                "variants": [{"price": "14.00"}],
                "images": [{"src": "//cdn.shopify.com/spencer.jpg"}]
            },
            {
                "title": "Victorian Corset",
                "handle": "victorian-corset",
                "tags": ["Underwear", "1860-1910"],
                "variants": [{"price": "12.00"}],
                "images": []
            },
            {
                "title": "Men's Waistcoat",
                "handle": "mens-waistcoat",
                "tags": "men, jacket, 1820-1860",
                "variants": []
            }
        ]})
    }

    fn client() -> HttpClient {
        HttpClient::new("test", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn handle_strips_trailing_slash() {
        assert_eq!(
            handle_from_url("https://blacksnailpatterns.com/products/my-pattern/"),
            "my-pattern"
        );
        assert_eq!(
            handle_from_url("https://blacksnailpatterns.com/collections/x/products/corset"),
            "corset"
        );
        assert_eq!(handle_from_url("corset"), "corset");
    }

    #[test]
    fn handle_ignores_query_and_fragment() {
        assert_eq!(
            handle_from_url("https://blacksnailpatterns.com/products/regency-spencer?variant=4471"),
            "regency-spencer"
        );
        assert_eq!(
            handle_from_url("https://blacksnailpatterns.com/products/regency-spencer#reviews"),
            "regency-spencer"
        );
        assert_eq!(
            handle_from_url("https://blacksnailpatterns.com/products/regency-spencer/?variant=1#top"),
            "regency-spencer"
        );
    }

    #[test]
    fn catalog_filter_matches_title_or_tag_case_insensitively() {
        let products = catalog()["products"].as_array().unwrap().clone();

        let jackets = filter_catalog(&products, "JACKET", "https://blacksnailpatterns.com", 10);
        let titles: Vec<_> = jackets.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Regency Spencer Jacket", "Men's Waistcoat"]);

        let corsets = filter_catalog(&products, "corset", "https://blacksnailpatterns.com", 10);
        assert_eq!(corsets.len(), 1);
        assert_eq!(corsets[0].url, "https://blacksnailpatterns.com/products/victorian-corset");
        assert_eq!(corsets[0].price.as_deref(), Some("12.00"));
        assert_eq!(corsets[0].image_url, None);

        assert_eq!(filter_catalog(&products, "jacket", "https://x.com", 1).len(), 1);
    }

    #[tokio::test]
    async fn search_fetches_full_catalog() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products.json"))
            .and(query_param("limit", "250"))
            .respond_with(ResponseTemplate::new(200).set_body_json(catalog()))
            .mount(&server)
            .await;

        let results = BlackSnail::with_base_url(client(), server.uri())
            .search("spencer", 10)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].brand.as_deref(), Some(BRAND));
        assert_eq!(results[0].image_url.as_deref(), Some("https://cdn.shopify.com/spencer.jpg"));
    }

    #[tokio::test]
    async fn detail_reads_product_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/regency-spencer.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "product": catalog()["products"][0].clone()
            })))
            .mount(&server)
            .await;

        let url = format!("{}/products/regency-spencer/", server.uri());
        let detail = BlackSnail::with_base_url(client(), server.uri())
            .detail(&url)
            .await
            .unwrap();

        assert_eq!(detail.title, "Regency Spencer Jacket");
        assert_eq!(detail.price.as_deref(), Some("14.00"));
        assert_eq!(detail.url, url);

        let url = format!("{}/products/regency-spencer?variant=4471", server.uri());
        let detail = BlackSnail::with_base_url(client(), server.uri())
            .detail(&url)
            .await
            .unwrap();
        assert_eq!(detail.title, "Regency Spencer Jacket");
    }

    #[tokio::test]
    async fn detail_without_product_is_a_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/gone.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let detail = BlackSnail::with_base_url(client(), server.uri())
            .detail("https://blacksnailpatterns.com/products/gone")
            .await
            .unwrap();

        assert_eq!(detail.title, "Unknown");
        assert_eq!(detail.brand.as_deref(), Some(BRAND));
    }

    #[tokio::test]
    async fn unknown_collection_is_rejected() {
        let err = BlackSnail::with_base_url(client(), "http://127.0.0.1:9")
            .list_collection("1500s")
            .await
            .unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("children"));
    }

    #[tokio::test]
    async fn collection_lists_every_product() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/collections/gratis-schnittmuster/products.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(catalog()))
            .mount(&server)
            .await;

        let results = BlackSnail::with_base_url(client(), server.uri())
            .list_collection("free")
            .await
            .unwrap();
        assert_eq!(results.len(), 3);
    }
}
