//! Cleaner's Supply (tailoring and sewing accessories)
//!
//! The storefront is rendered client-side, so listings come from a web
//! search scoped to the domain: title and URL only.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::models::FabricResult;
use crate::search::WebSearch;
use crate::traits::FabricScraper;

pub const SOURCE: &str = "cleanersupply";
const SITE: &str = "cleanersupply.ca";

pub struct Cleanersupply {
    web: Arc<dyn WebSearch>,
}

impl Cleanersupply {
    pub fn new(web: Arc<dyn WebSearch>) -> Self {
        Self { web }
    }
}

#[async_trait]
impl FabricScraper for Cleanersupply {
    fn source(&self) -> &'static str {
        SOURCE
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<FabricResult>> {
        info!("Searching {} via web search for '{}'", SOURCE, query);

        let hits = self
            .web
            .search(&format!("site:{SITE} {query}"), max_results)
            .await?;

        Ok(hits
            .into_iter()
            .filter(|hit| !hit.title.is_empty() && !hit.url.is_empty())
            .take(max_results)
            .map(|hit| FabricResult {
                source: SOURCE.to_string(),
                title: hit.title,
                price: None,
                image_url: None,
                url: hit.url,
            })
            .collect())
    }
}
