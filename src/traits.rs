//! Traits and interfaces for site-agnostic scraping

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{FabricResult, PatternDetail, PatternSearchResult};

/// CSS selectors for a card-based product listing
#[derive(Debug, Clone)]
pub struct CardSelectors {
    /// Container selector for individual product cards
    pub product_container: &'static str,
    /// Title link within the card; its href is the product URL
    pub title: &'static str,
    /// Price selector within the card
    pub price: &'static str,
    /// Image selector within the card
    pub image: &'static str,
}

/// Build a search URL from a pattern holding a `{query}` placeholder.
pub fn build_search_url(pattern: &str, query: &str) -> String {
    let encoded = urlencoding::encode(query.trim());
    pattern.replace("{query}", &encoded)
}

/// A fabric/notions store that can be searched by keyword
#[async_trait]
pub trait FabricScraper: Send + Sync {
    /// Registry key, also stamped on every returned record
    fn source(&self) -> &'static str;

    /// Search the store, returning at most `max_results` listings.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<FabricResult>>;
}

/// A pattern seller or pattern blog that can be searched by keyword
#[async_trait]
pub trait PatternScraper: Send + Sync {
    fn source(&self) -> &'static str;

    /// Search the catalog, returning at most `max_results` hits.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<PatternSearchResult>>;

    /// Detail capability, if the site can be read directly.
    fn detail_scraper(&self) -> Option<&dyn PatternDetailScraper> {
        None
    }
}

/// Reads one pattern page into a [`PatternDetail`]
#[async_trait]
pub trait PatternDetailScraper: Send + Sync {
    fn source(&self) -> &'static str;

    /// Fetch and extract the pattern at `url`.
    ///
    /// Transport failures are errors; a page without recognisable product
    /// data yields a placeholder record instead.
    async fn detail(&self, url: &str) -> Result<PatternDetail>;
}
