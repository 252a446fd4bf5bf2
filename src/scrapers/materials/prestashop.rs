//! PrestaShop classic-theme storefront search

use async_trait::async_trait;
use tracing::info;

use crate::client::HttpClient;
use crate::error::Result;
use crate::models::FabricResult;
use crate::scrapers::parse_cards;
use crate::traits::{CardSelectors, FabricScraper, build_search_url};

const SELECTORS: CardSelectors = CardSelectors {
    product_container: ".product-miniature",
    title: ".product-title a, .product-name a",
    price: "span.price",
    image: "img",
};

/// Any store running the PrestaShop classic theme
pub struct PrestaShopStore {
    client: HttpClient,
    base_url: String,
    source: &'static str,
}

impl PrestaShopStore {
    pub fn new(client: HttpClient, base_url: impl Into<String>, source: &'static str) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            source,
        }
    }

    /// Tonitex, wholesale fabric in Montreal.
    pub fn tonitex(client: HttpClient) -> Self {
        Self::new(client, "https://tonitex.com", "tonitex")
    }

    /// Fine Fabrics Canada, mid-to-high-end online retailer.
    pub fn fine_fabrics_canada(client: HttpClient) -> Self {
        Self::new(client, "https://finefabricscanada.com", "fine_fabrics_canada")
    }

    fn search_url(&self, query: &str) -> String {
        let pattern = format!("{}/en/search?controller=search&s={{query}}", self.base_url);
        build_search_url(&pattern, query)
    }
}

#[async_trait]
impl FabricScraper for PrestaShopStore {
    fn source(&self) -> &'static str {
        self.source
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<FabricResult>> {
        info!("Searching {} for '{}'", self.source, query);

        let html = self.client.get_text(&self.search_url(query)).await?;
        let results = parse_cards(&html, &self.base_url, self.source, &SELECTORS, max_results);

        info!("Found {} results on {}", results.len(), self.source);
        Ok(results)
    }
}
