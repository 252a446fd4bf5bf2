//! Per-site adapters

pub mod materials;
pub mod patterns;

use scraper::{ElementRef, Html};
use tracing::debug;

use crate::extract::{absolutize, all, attr, first, text_of};
use crate::models::FabricResult;
use crate::traits::CardSelectors;

/// Parse a card-based listing page into fabric results.
///
/// Cards without a title or product link are skipped; `max_results` caps the
/// accepted results, not the cards inspected.
pub(crate) fn parse_cards(
    html: &str,
    base_url: &str,
    source: &str,
    selectors: &CardSelectors,
    max_results: usize,
) -> Vec<FabricResult> {
    let document = Html::parse_document(html);
    let mut results = Vec::new();

    for card in all(document.root_element(), selectors.product_container) {
        if results.len() >= max_results {
            break;
        }

        let Some(title_el) = first(card, selectors.title) else {
            debug!("{}: card without title, skipping", source);
            continue;
        };
        let title = text_of(title_el);
        let Some(href) = attr(title_el, "href") else {
            debug!("{}: card '{}' has no link, skipping", source, title);
            continue;
        };
        if title.is_empty() {
            continue;
        }

        let price = first(card, selectors.price)
            .map(text_of)
            .filter(|p| !p.is_empty());
        let image_url = first(card, selectors.image)
            .and_then(image_src)
            .map(|src| absolutize(base_url, &src));

        results.push(FabricResult {
            source: source.to_string(),
            title,
            price,
            image_url,
            url: absolutize(base_url, &href),
        });
    }

    results
}

/// Try `data-src` first (lazy loading), then `src`; inline data URIs are placeholders.
pub(crate) fn image_src(img: ElementRef<'_>) -> Option<String> {
    ["data-src", "src"]
        .into_iter()
        .filter_map(|name| attr(img, name))
        .find(|src| !src.starts_with("data:"))
}
