//! The Fabric Club (Magento 2, membership-based Montreal retailer)

use async_trait::async_trait;
use tracing::info;

use crate::client::HttpClient;
use crate::error::Result;
use crate::models::FabricResult;
use crate::scrapers::parse_cards;
use crate::traits::{CardSelectors, FabricScraper, build_search_url};

pub const SOURCE: &str = "the_fabric_club";
const BASE_URL: &str = "https://www.thefabricclub.ca";

const SELECTORS: CardSelectors = CardSelectors {
    product_container: "li.item.product.product-item",
    title: "strong.product-item-name a.product-item-link",
    price: "span.price-wrapper span.price",
    image: "img.product-image-photo",
};

pub struct TheFabricClub {
    client: HttpClient,
    base_url: String,
}

impl TheFabricClub {
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }
}

#[async_trait]
impl FabricScraper for TheFabricClub {
    fn source(&self) -> &'static str {
        SOURCE
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<FabricResult>> {
        info!("Searching {} for '{}'", SOURCE, query);

        let url = build_search_url(&format!("{}/en/search?q={{query}}", self.base_url), query);
        let html = self.client.get_text(&url).await?;

        Ok(parse_cards(&html, &self.base_url, SOURCE, &SELECTORS, max_results))
    }
}
