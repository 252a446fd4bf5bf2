//! Truly Victorian (WordPress + WooCommerce)

use async_trait::async_trait;
use scraper::{ElementRef, Html};
use tracing::info;

use crate::client::HttpClient;
use crate::error::Result;
use crate::extract::{absolutize, all, attr, first, first_text, text_of};
use crate::models::{PatternDetail, PatternSearchResult, UNKNOWN_TITLE};
use crate::scrapers::image_src;
use crate::traits::{PatternDetailScraper, PatternScraper};

pub const SOURCE: &str = "truly_victorian";
pub const BRAND: &str = "Truly Victorian";
const BASE_URL: &str = "https://trulyvictorian.info";

const FABRIC_KEYWORDS: [&str; 8] = [
    "fabric", "wool", "cotton", "silk", "linen", "muslin", "velvet", "taffeta",
];

pub struct TrulyVictorian {
    client: HttpClient,
    base_url: String,
}

impl TrulyVictorian {
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }
}

#[async_trait]
impl PatternScraper for TrulyVictorian {
    fn source(&self) -> &'static str {
        SOURCE
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<PatternSearchResult>> {
        info!("Searching {} for '{}'", SOURCE, query);

        let url = format!("{}/", self.base_url);
        let html = self
            .client
            .get_text_with_query(&url, &[("s", query), ("post_type", "product")])
            .await?;

        Ok(parse_product_list(&html, &self.base_url, max_results))
    }

    fn detail_scraper(&self) -> Option<&dyn PatternDetailScraper> {
        Some(self)
    }
}

#[async_trait]
impl PatternDetailScraper for TrulyVictorian {
    fn source(&self) -> &'static str {
        SOURCE
    }

    async fn detail(&self, url: &str) -> Result<PatternDetail> {
        info!("Fetching {} pattern {}", SOURCE, url);
        let html = self.client.get_text(url).await?;
        Ok(parse_detail(&html, url))
    }
}

/// Product cards from a WooCommerce listing page.
pub(crate) fn parse_product_list(html: &str, base_url: &str, max_results: usize) -> Vec<PatternSearchResult> {
    let document = Html::parse_document(html);
    let mut results = Vec::new();

    for product in all(document.root_element(), "ul.products li.product") {
        if results.len() >= max_results {
            break;
        }
        let link = first(product, "a.woocommerce-loop-product__link").and_then(|a| attr(a, "href"));
        let title = first_text(product, ".woocommerce-loop-product__title");
        let (Some(href), Some(title)) = (link, title) else {
            continue;
        };

        results.push(PatternSearchResult {
            source: SOURCE.to_string(),
            title,
            pattern_number: None,
            brand: Some(BRAND.to_string()),
            difficulty: None,
            price: first_text(product, ".price .woocommerce-Price-amount bdi"),
            image_url: first(product, "img")
                .and_then(image_src)
                .map(|src| absolutize(base_url, &src)),
            url: absolutize(base_url, &href),
        });
    }

    results
}

pub(crate) fn parse_detail(html: &str, url: &str) -> PatternDetail {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let title = first_text(root, "h1.product_title")
        .or_else(|| first_text(root, "h1.entry-title"))
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());
    let description = first(root, "div.woocommerce-product-details__short-description")
        .or_else(|| first(root, "div#tab-description"));

    let mut detail = PatternDetail::minimal(SOURCE, title, url).with_brand(BRAND);
    detail.pattern_number = first_text(root, "span.sku");
    detail.price = first_text(root, "p.price .woocommerce-Price-amount bdi");
    detail.image_url = first(root, "div.woocommerce-product-gallery img")
        .and_then(image_src)
        .map(|src| absolutize(url, &src));
    detail.fabric_recommendations = description.map(extract_fabrics).unwrap_or_default();
    detail
}

/// List items mentioning a fabric; paragraphs only when no list item does.
pub(crate) fn extract_fabrics(description: ElementRef<'_>) -> Vec<String> {
    let mentions_fabric = |text: &String| {
        let lower = text.to_lowercase();
        FABRIC_KEYWORDS.iter().any(|kw| lower.contains(kw))
    };

    let from_items: Vec<String> = all(description, "li")
        .into_iter()
        .map(text_of)
        .filter(mentions_fabric)
        .collect();
    if !from_items.is_empty() {
        return from_items;
    }

    all(description, "p")
        .into_iter()
        .map(text_of)
        .filter(mentions_fabric)
        .collect()
}
