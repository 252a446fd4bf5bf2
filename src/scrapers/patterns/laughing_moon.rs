//! Laughing Moon Mercantile
//!
//! The storefront renders its catalog with JavaScript, so search goes through
//! a site-scoped web search and there is no detail view.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::models::PatternSearchResult;
use crate::search::WebSearch;
use crate::traits::PatternScraper;

pub const SOURCE: &str = "laughing_moon";
pub const BRAND: &str = "Laughing Moon Mercantile";
const SITE: &str = "laughingmoonmercantile.com";

pub struct LaughingMoon {
    web: Arc<dyn WebSearch>,
}

impl LaughingMoon {
    pub fn new(web: Arc<dyn WebSearch>) -> Self {
        Self { web }
    }
}

#[async_trait]
impl PatternScraper for LaughingMoon {
    fn source(&self) -> &'static str {
        SOURCE
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<PatternSearchResult>> {
        info!("Searching {} via web search for '{}'", SOURCE, query);

        let hits = self
            .web
            .search(&format!("site:{SITE} {query}"), max_results)
            .await?;

        Ok(hits
            .into_iter()
            .filter(|hit| !hit.title.is_empty() && !hit.url.is_empty())
            .take(max_results)
            .map(|hit| PatternSearchResult {
                source: SOURCE.to_string(),
                title: hit.title,
                pattern_number: None,
                brand: Some(BRAND.to_string()),
                difficulty: None,
                price: None,
                image_url: None,
                url: hit.url,
            })
            .collect())
    }
}
