//! Best-effort reader for pattern pages on hosts without a dedicated adapter

use async_trait::async_trait;
use scraper::Html;
use tracing::info;

use crate::client::HttpClient;
use crate::error::Result;
use crate::extract::{extract_image, extract_price, extract_title};
use crate::models::PatternDetail;
use crate::traits::PatternDetailScraper;

pub const SOURCE: &str = "custom";

#[derive(Clone)]
pub struct GenericScraper {
    client: HttpClient,
}

impl GenericScraper {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PatternDetailScraper for GenericScraper {
    fn source(&self) -> &'static str {
        SOURCE
    }

    async fn detail(&self, url: &str) -> Result<PatternDetail> {
        info!("Fetching {} with the generic extractor", url);
        let html = self.client.get_text(url).await?;
        Ok(parse_page(&html, url))
    }
}

pub(crate) fn parse_page(html: &str, url: &str) -> PatternDetail {
    let document = Html::parse_document(html);

    let mut detail = PatternDetail::minimal(SOURCE, extract_title(&document), url);
    detail.price = extract_price(&document);
    detail.image_url = extract_image(&document, url);
    detail
}
