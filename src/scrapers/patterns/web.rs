//! Source-less pattern search across the big pattern houses
//!
//! Not part of the keyed pattern registry: it fans out through a web search
//! limited to a few catalog sites and tags every hit with source `web`.

use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::models::PatternSearchResult;
use crate::search::WebSearch;

pub const SOURCE: &str = "web";

/// Catalog sites covered by the search, with the brand shown for their hits
const SITES: [(&str, &str); 3] = [
    ("simplicity.com", "Simplicity"),
    ("mccall.com", "McCall's"),
    ("burdastyle.com", "Burda Style"),
];

#[derive(Clone)]
pub struct PatternWebSearch {
    web: Arc<dyn WebSearch>,
}

impl PatternWebSearch {
    pub fn new(web: Arc<dyn WebSearch>) -> Self {
        Self { web }
    }

    pub async fn search(&self, query: &str, max_results: usize) -> Result<Vec<PatternSearchResult>> {
        info!("Searching pattern sites via web search for '{}'", query);

        let hits = self.web.search(&site_query(query), max_results).await?;

        Ok(hits
            .into_iter()
            .filter(|hit| !hit.title.is_empty() && !hit.url.is_empty())
            .take(max_results)
            .map(|hit| PatternSearchResult {
                source: SOURCE.to_string(),
                brand: brand_for(&hit.url).map(str::to_string),
                title: hit.title,
                pattern_number: None,
                difficulty: None,
                price: None,
                image_url: None,
                url: hit.url,
            })
            .collect())
    }
}

fn site_query(query: &str) -> String {
    let sites = SITES
        .iter()
        .map(|(site, _)| format!("site:{site}"))
        .collect::<Vec<_>>()
        .join(" OR ");
    format!("sewing pattern {} {}", query.trim(), sites)
}

fn brand_for(url: &str) -> Option<&'static str> {
    SITES
        .iter()
        .find(|(site, _)| url.contains(site))
        .map(|(_, brand)| *brand)
}
