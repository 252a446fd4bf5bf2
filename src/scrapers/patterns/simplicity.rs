//! Simplicity.com, which also hosts McCall's, Vogue, Butterick and New Look

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use scraper::Html;
use serde_json::Value;
use tracing::{debug, info};

use crate::client::HttpClient;
use crate::error::Result;
use crate::extract::{
    absolutize, all, attr, find_json_ld, first, first_text, json_image, json_text, text_of,
};
use crate::models::{PatternDetail, PatternSearchResult, UNKNOWN_TITLE};
use crate::traits::{PatternDetailScraper, PatternScraper};

pub const SOURCE: &str = "simplicity";
const BASE_URL: &str = "https://simplicity.com";

const BRAND_MAP: [(&str, &str); 5] = [
    ("/simplicity/", "Simplicity"),
    ("/mccalls/", "McCall's"),
    ("/vogue-patterns/", "Vogue"),
    ("/new-look/", "New Look"),
    ("/butterick/", "Butterick"),
];

static FABRICS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)FABRICS:\s*(.+?)(?:NOTIONS:|Size Combinations:|$)").expect("valid regex")
});
static NOTIONS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)NOTIONS:\s*(.+?)(?:Size Combinations:|$)").expect("valid regex")
});
static COMMA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s*").expect("valid regex"));
static SENTENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.\s+").expect("valid regex"));

pub struct Simplicity {
    client: HttpClient,
    base_url: String,
}

impl Simplicity {
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }
}

#[async_trait]
impl PatternScraper for Simplicity {
    fn source(&self) -> &'static str {
        SOURCE
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<PatternSearchResult>> {
        info!("Searching {} for '{}'", SOURCE, query);

        let url = format!("{}/search.php", self.base_url);
        let html = self
            .client
            .get_text_with_query(&url, &[("section", "product"), ("search_query", query)])
            .await?;

        Ok(parse_search(&html, &self.base_url, max_results))
    }

    fn detail_scraper(&self) -> Option<&dyn PatternDetailScraper> {
        Some(self)
    }
}

#[async_trait]
impl PatternDetailScraper for Simplicity {
    fn source(&self) -> &'static str {
        SOURCE
    }

    async fn detail(&self, url: &str) -> Result<PatternDetail> {
        info!("Fetching {} pattern {}", SOURCE, url);
        let html = self.client.get_text(url).await?;
        Ok(parse_detail(&html, url))
    }
}

fn brand_from_url(url: &str) -> &'static str {
    BRAND_MAP
        .iter()
        .find(|(path, _)| url.contains(path))
        .map_or("Unknown", |(_, brand)| brand)
}

pub(crate) fn parse_search(html: &str, base_url: &str, max_results: usize) -> Vec<PatternSearchResult> {
    let document = Html::parse_document(html);
    let mut results = Vec::new();

    for card in all(document.root_element(), "article.card") {
        if results.len() >= max_results {
            break;
        }
        let Some(title_el) = first(card, "a.card-title") else {
            continue;
        };
        let (title, Some(href)) = (text_of(title_el), attr(title_el, "href")) else {
            continue;
        };
        if title.is_empty() {
            continue;
        }

        let url = absolutize(base_url, &href);
        results.push(PatternSearchResult {
            source: SOURCE.to_string(),
            title,
            pattern_number: first_text(card, "span.productSku"),
            brand: Some(brand_from_url(&url).to_string()),
            difficulty: None,
            price: first_text(card, "div.card-text[data-test-info-type='price'] span:last-child"),
            image_url: first(card, "figure.card-figure img")
                .and_then(|img| attr(img, "src"))
                .map(|src| absolutize(base_url, &src)),
            url,
        });
    }

    results
}

/// Product fields come from the JSON-LD `Product` block; sizes from the size dropdown.
pub(crate) fn parse_detail(html: &str, url: &str) -> PatternDetail {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let Some(product) = find_json_ld(&document, "Product") else {
        debug!("{}: no Product JSON-LD on {}", SOURCE, url);
        let title = first_text(root, "h1").unwrap_or_else(|| UNKNOWN_TITLE.to_string());
        return PatternDetail::minimal(SOURCE, title, url);
    };

    let title = first_text(root, "h1.productView-title")
        .or_else(|| json_text(product.get("name")))
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    let sizes = all(root, "select[id^='attribute_select'] option:not([value=''])")
        .into_iter()
        .map(text_of)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    let description = json_text(product.get("description")).unwrap_or_default();
    let (fabric_recommendations, notions) = parse_description(&description);

    PatternDetail {
        source: SOURCE.to_string(),
        title,
        pattern_number: json_text(product.get("sku")),
        brand: brand_name(product.get("brand")),
        difficulty: None,
        sizes: Some(sizes).filter(|s| !s.is_empty()),
        price: offer_price(product.get("offers")),
        fabric_recommendations,
        notions,
        image_url: json_image(product.get("image")).map(|i| absolutize(url, &i)),
        url: url.to_string(),
    }
}

fn brand_name(brand: Option<&Value>) -> Option<String> {
    match brand? {
        Value::Object(obj) => json_text(obj.get("name")),
        other => json_text(Some(other)),
    }
}

fn offer_price(offers: Option<&Value>) -> Option<String> {
    match offers? {
        Value::Array(list) => list.first().and_then(|o| json_text(o.get("price"))),
        offer => json_text(offer.get("price")),
    }
}

/// Split the catalog description into fabric and notion lists.
///
/// The text carries uppercase `FABRICS:` and `NOTIONS:` labels, optionally
/// followed by a `Size Combinations:` trailer.
pub fn parse_description(description: &str) -> (Vec<String>, Vec<String>) {
    let fabrics = FABRICS_RE
        .captures(description)
        .map(|caps| {
            COMMA_RE
                .split(&caps[1])
                .map(str::trim)
                .filter(|f| f.chars().count() > 2)
                .map(|f| f.trim_end_matches('.').to_string())
                .collect()
        })
        .unwrap_or_default();

    let notions = NOTIONS_RE
        .captures(description)
        .map(|caps| {
            SENTENCE_RE
                .split(&caps[1])
                .map(str::trim)
                .filter(|n| n.chars().count() > 2)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    (fabrics, notions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DESCRIPTION: &str = "Flared cape has purchased ribbon ties. A: Hood and contrast lining. \
        FABRICS: Lightweight Satin, Lightweight Broadcloth, Sheer Fabrics. \
        NOTIONS: 1 yd of ribbon. Cape A: Seam Binding 1.5 yds. \
        Size Combinations: (Small, Medium, Large, X-Large)";

    const SEARCH_HTML: &str = r#"
    <html><body>
    <article class="card viewBox" data-product-id="123">
        <figure class="card-figure">
            <a href="https://simplicity.com/simplicity/s9898" class="card-figure__link">
                <img src="https://cdn.example.com/s9898.jpg" alt="S9898">
            </a>
        </figure>
        <div class="card-body">
            <span class="productSku">S9898</span>
            <a class="card-title" href="https://simplicity.com/simplicity/s9898">
                Simplicity Easy Summer Dress
            </a>
            <div class="card-text" data-test-info-type="price">
                <s>$20.95</s><span>$14.67</span>
            </div>
        </div>
    </article>
    <article class="card"><a class="card-title" href="/butterick/b6999">Butterick Coat</a></article>
    </body></html>
    "#;

    const DETAIL_HTML: &str = r#"
    <html><body>
    <h1 class="productView-title">McCall's Cape Costume</h1>
    <select id="attribute_select_1">
        <option value="">Choose Size:</option>
        <option value="1">S-M-L-XL</option>
    </select>
    <script type="application/ld+json">
    {
        "@context": "https://schema.org/",
        "@type": "Product",
        "name": "M4139",
        "sku": "M4139",
        "brand": {"@type": "Brand", "name": "McCall's"},
        "description": "Flared cape. FABRICS: Lightweight Satin, Broadcloth. NOTIONS: 1 yd ribbon. Size Combinations: S-M-L-XL",
        "image": "https://cdn.example.com/m4139.jpg",
        "offers": {"@type": "Offer", "price": "10.47", "priceCurrency": "USD"}
    }
    </script>
    </body></html>
    "#;

    #[test]
    fn description_splits_fabrics_and_notions() {
        let (fabrics, notions) = parse_description(DESCRIPTION);

        assert_eq!(
            fabrics,
            ["Lightweight Satin", "Lightweight Broadcloth", "Sheer Fabrics"]
        );
        assert_eq!(notions, ["1 yd of ribbon", "Cape A: Seam Binding 1.5 yds"]);
        assert!(
            fabrics
                .iter()
                .chain(&notions)
                .all(|m| !m.contains("Size Combinations") && !m.contains("Small"))
        );
    }

    #[test]
    fn description_labels_are_case_insensitive_and_span_lines() {
        let (fabrics, notions) =
            parse_description("fabrics: Cotton Lawn,\nVoile.\nnotions: Buttons. Interfacing");
        assert_eq!(fabrics, ["Cotton Lawn", "Voile"]);
        assert_eq!(notions, ["Buttons", "Interfacing"]);
    }

    #[test]
    fn description_drops_short_entries() {
        let (fabrics, _) = parse_description("FABRICS: Silk, AB, Linen");
        assert_eq!(fabrics, ["Silk", "Linen"]);
    }

    #[test]
    fn description_without_labels_is_empty() {
        assert_eq!(parse_description(""), (vec![], vec![]));
        assert_eq!(
            parse_description("Just a plain description with no labels."),
            (vec![], vec![])
        );
    }

    #[test]
    fn search_reads_cards_and_brands() {
        let results = parse_search(SEARCH_HTML, "https://simplicity.com", 10);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Simplicity Easy Summer Dress");
        assert_eq!(results[0].pattern_number.as_deref(), Some("S9898"));
        assert_eq!(results[0].price.as_deref(), Some("$14.67"));
        assert_eq!(results[0].brand.as_deref(), Some("Simplicity"));
        assert_eq!(results[0].image_url.as_deref(), Some("https://cdn.example.com/s9898.jpg"));
        assert_eq!(results[1].url, "https://simplicity.com/butterick/b6999");
        assert_eq!(results[1].brand.as_deref(), Some("Butterick"));
    }

    #[test]
    fn detail_reads_json_ld_and_sizes() {
        let detail = parse_detail(DETAIL_HTML, "https://simplicity.com/mccalls/m4139");

        assert_eq!(detail.title, "McCall's Cape Costume");
        assert_eq!(detail.pattern_number.as_deref(), Some("M4139"));
        assert_eq!(detail.brand.as_deref(), Some("McCall's"));
        assert_eq!(detail.price.as_deref(), Some("10.47"));
        assert_eq!(detail.sizes.as_deref(), Some("S-M-L-XL"));
        assert_eq!(detail.fabric_recommendations, ["Lightweight Satin", "Broadcloth"]);
        assert_eq!(detail.notions, ["1 yd ribbon"]);
        assert_eq!(detail.image_url.as_deref(), Some("https://cdn.example.com/m4139.jpg"));
    }

    #[test]
    fn detail_without_json_ld_is_a_placeholder() {
        let detail = parse_detail("<html></html>", "https://simplicity.com/mccalls/m4139");
        assert_eq!(detail.title, "Unknown");
        assert_eq!(detail.url, "https://simplicity.com/mccalls/m4139");
        assert!(detail.fabric_recommendations.is_empty());
    }

    #[tokio::test]
    async fn search_hits_catalog_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.php"))
            .and(query_param("section", "product"))
            .and(query_param("search_query", "summer dress"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_HTML))
            .mount(&server)
            .await;

        let client = HttpClient::new("test", Duration::from_secs(5)).unwrap();
        let results = Simplicity::with_base_url(client, server.uri())
            .search("summer dress", 1)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].pattern_number.as_deref(), Some("S9898"));
    }
}
