//! Mood Fabrics sewing blog (free patterns published as WordPress posts)
//!
//! The PDF patterns themselves sit behind an email signup; only the post is surfaced.

use async_trait::async_trait;
use scraper::{ElementRef, Html};
use tracing::{debug, info};

use crate::client::HttpClient;
use crate::error::Result;
use crate::extract::{
    absolutize, all, attr, find_json_ld, first, first_text, json_image, json_text, text_of,
};
use crate::models::{PatternDetail, PatternSearchResult, UNKNOWN_TITLE};
use crate::scrapers::image_src;
use crate::traits::{PatternDetailScraper, PatternScraper};

pub const SOURCE: &str = "mood";
pub const BRAND: &str = "Mood Fabrics";
const BASE_URL: &str = "https://blog.moodfabrics.com";

const MATERIAL_KEYWORDS: [&str; 7] = [
    "material",
    "fabric",
    "supply",
    "supplies",
    "you'll need",
    "you need",
    "what you need",
];

pub struct MoodBlog {
    client: HttpClient,
    base_url: String,
}

impl MoodBlog {
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }
}

#[async_trait]
impl PatternScraper for MoodBlog {
    fn source(&self) -> &'static str {
        SOURCE
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<PatternSearchResult>> {
        info!("Searching {} blog for '{}'", SOURCE, query);

        let url = format!("{}/", self.base_url);
        let html = self.client.get_text_with_query(&url, &[("s", query)]).await?;

        Ok(parse_search(&html, &self.base_url, max_results))
    }

    fn detail_scraper(&self) -> Option<&dyn PatternDetailScraper> {
        Some(self)
    }
}

#[async_trait]
impl PatternDetailScraper for MoodBlog {
    fn source(&self) -> &'static str {
        SOURCE
    }

    async fn detail(&self, url: &str) -> Result<PatternDetail> {
        info!("Fetching {} post {}", SOURCE, url);
        let html = self.client.get_text(url).await?;
        Ok(parse_detail(&html, url))
    }
}

pub(crate) fn parse_search(html: &str, base_url: &str, max_results: usize) -> Vec<PatternSearchResult> {
    let document = Html::parse_document(html);
    let mut results = Vec::new();

    for article in all(document.root_element(), "article") {
        if results.len() >= max_results {
            break;
        }
        let Some(link) = first(article, "h2 a").or_else(|| first(article, "h1 a")) else {
            continue;
        };
        let (title, Some(href)) = (text_of(link), attr(link, "href")) else {
            continue;
        };
        if title.is_empty() {
            continue;
        }

        results.push(PatternSearchResult {
            source: SOURCE.to_string(),
            title,
            pattern_number: None,
            brand: Some(BRAND.to_string()),
            difficulty: None,
            price: None,
            image_url: first(article, "img")
                .and_then(image_src)
                .map(|src| absolutize(base_url, &src)),
            url: absolutize(base_url, &href),
        });
    }

    results
}

/// Title and image from the `BlogPosting` JSON-LD, materials from the post body.
pub(crate) fn parse_detail(html: &str, url: &str) -> PatternDetail {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let Some(posting) = find_json_ld(&document, "BlogPosting") else {
        debug!("{}: no BlogPosting JSON-LD on {}", SOURCE, url);
        let title = first_text(root, "h1").unwrap_or_else(|| UNKNOWN_TITLE.to_string());
        return PatternDetail::minimal(SOURCE, title, url).with_brand(BRAND);
    };

    let title = json_text(posting.get("headline")).unwrap_or_else(|| UNKNOWN_TITLE.to_string());
    let content = first(root, "div.entry-content").or_else(|| first(root, "article"));

    let mut detail = PatternDetail::minimal(SOURCE, title, url).with_brand(BRAND);
    detail.image_url = json_image(posting.get("image")).map(|i| absolutize(url, &i));
    detail.fabric_recommendations = content.map(extract_materials).unwrap_or_default();
    detail
}

/// Find a heading that announces the materials, then read the element right after it.
pub(crate) fn extract_materials(content: ElementRef<'_>) -> Vec<String> {
    for heading in all(content, "h2, h3, h4") {
        let text = text_of(heading).to_lowercase();
        if !MATERIAL_KEYWORDS.iter().any(|kw| text.contains(kw)) {
            continue;
        }

        let Some(sibling) = heading.next_siblings().find_map(ElementRef::wrap) else {
            continue;
        };
        match sibling.value().name() {
            "ul" | "ol" => {
                return all(sibling, "li")
                    .into_iter()
                    .map(text_of)
                    .filter(|t| !t.is_empty())
                    .collect();
            }
            "p" => return vec![text_of(sibling)],
            _ => {}
        }
    }
    Vec::new()
}
