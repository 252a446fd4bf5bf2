//! General web search and the per-material purchase-link search built on it

mod duckduckgo;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::Result;
use crate::models::PurchaseLink;

pub use duckduckgo::DuckDuckGo;

/// One organic result from a web search engine
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: Option<String>,
}

/// A general-purpose web search engine
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;
}

/// Finds places to buy each material of a pattern
#[async_trait]
pub trait MaterialSearch: Send + Sync {
    /// Query every material independently; each link is tagged with its material.
    async fn search(&self, materials: &[String]) -> Result<Vec<PurchaseLink>>;
}

/// [`MaterialSearch`] backed by a [`WebSearch`] engine
pub struct WebMaterialSearch {
    web: Arc<dyn WebSearch>,
    links_per_material: usize,
}

impl WebMaterialSearch {
    pub fn new(web: Arc<dyn WebSearch>, links_per_material: usize) -> Self {
        Self {
            web,
            links_per_material,
        }
    }
}

#[async_trait]
impl MaterialSearch for WebMaterialSearch {
    /// Runs the searches one after another. A material whose search fails is
    /// logged and left out; the others still return their links.
    async fn search(&self, materials: &[String]) -> Result<Vec<PurchaseLink>> {
        let mut links = Vec::new();

        for material in materials {
            let query = format!("buy {material} fabric online sewing");
            let hits = match self.web.search(&query, self.links_per_material).await {
                Ok(hits) => hits,
                Err(e) => {
                    warn!("Material search failed for '{}': {}", material, e);
                    continue;
                }
            };

            links.extend(hits.into_iter().take(self.links_per_material).map(|hit| {
                PurchaseLink {
                    material: material.clone(),
                    store: hit.title,
                    url: hit.url,
                    snippet: hit.snippet,
                }
            }));
        }

        info!(
            "Found {} purchase links for {} materials",
            links.len(),
            materials.len()
        );
        Ok(links)
    }
}
