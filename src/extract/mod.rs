//! Low-level extraction helpers shared by the adapters
//!
//! Each locator tries an ordered list of strategies and returns the first one
//! that yields non-empty text. Selectors that fail to parse count as a miss.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::models::UNKNOWN_TITLE;

/// `$12.00`, `£8.50`, `€10,00`, `12.50 €`, `$1,299.00`
static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\$£€]\s*\d+(?:[,.]\d{3})*[\.,]\d{2}|\d+(?:[,.]\d{3})*[\.,]\d{2}\s*[\$£€]")
        .expect("valid regex")
});

const IMAGE_DENY_LIST: [&str; 5] = ["logo", "icon", "pixel", "track", "badge"];
const CURRENCY_MARKERS: [&str; 5] = ["$", "£", "€", "CAD", "USD"];

// ── Element helpers ──────────────────────────────────────────────────────────

/// First element under `scope` matching `css`.
pub fn first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    scope.select(&selector).next()
}

/// Every element under `scope` matching `css`, in document order.
pub fn all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => scope.select(&selector).collect(),
        Err(e) => {
            debug!("unparseable selector {:?}: {:?}", css, e);
            Vec::new()
        }
    }
}

/// Visible text of an element with whitespace collapsed.
pub fn text_of(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first match, if it is non-empty.
pub fn first_text(scope: ElementRef<'_>, css: &str) -> Option<String> {
    first(scope, css).map(text_of).filter(|t| !t.is_empty())
}

/// Trimmed attribute value, if present and non-empty.
pub fn attr(el: ElementRef<'_>, name: &str) -> Option<String> {
    el.value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// `content` of `<meta property="...">`.
pub fn meta_content(document: &Html, property: &str) -> Option<String> {
    let css = format!(r#"meta[property="{property}"]"#);
    first(document.root_element(), &css).and_then(|m| attr(m, "content"))
}

// ── URLs ─────────────────────────────────────────────────────────────────────

/// Resolve `href` against `base` so the result always carries scheme and host.
///
/// Protocol-relative links are forced to https.
pub fn absolutize(base: &str, href: &str) -> String {
    let href = href.trim();
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    if let Some(rest) = href.strip_prefix("//") {
        return format!("https://{rest}");
    }

    match Url::parse(base).and_then(|b| b.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}/{}", base.trim_end_matches('/'), href.trim_start_matches('/')),
    }
}

// ── Title / price / image ────────────────────────────────────────────────────

/// `<h1>` → `og:title` → `<title>` → "Unknown".
pub fn extract_title(document: &Html) -> String {
    let root = document.root_element();

    first_text(root, "h1")
        .or_else(|| meta_content(document, "og:title"))
        .or_else(|| first_text(root, "title"))
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}

/// Structured price metadata first, then the first currency amount in the page text.
pub fn extract_price(document: &Html) -> Option<String> {
    for name in ["product:price:amount", "og:price:amount"] {
        if let Some(amount) = meta_content(document, name) {
            let currency =
                meta_content(document, &name.replace("amount", "currency")).unwrap_or_default();
            return Some(format!("{amount} {currency}").trim().to_string());
        }
    }

    document
        .root_element()
        .text()
        .find_map(|t| PRICE_RE.find(t))
        .map(|m| m.as_str().trim().to_string())
}

/// `og:image`, else the first content-looking `<img>`, resolved against `page_url`.
pub fn extract_image(document: &Html, page_url: &str) -> Option<String> {
    if let Some(og) = meta_content(document, "og:image") {
        return Some(absolutize(page_url, &og));
    }

    all(document.root_element(), "img[src]")
        .into_iter()
        .filter_map(|img| img.value().attr("src"))
        .map(str::trim)
        .find(|src| is_content_image(src))
        .map(|src| absolutize(page_url, src))
}

fn is_content_image(src: &str) -> bool {
    if src.starts_with("data:") || src.len() < 10 {
        return false;
    }
    let lower = src.to_lowercase();
    !IMAGE_DENY_LIST.iter().any(|skip| lower.contains(skip))
}

/// Shopify suggest prices arrive as bare decimals; those are assumed to be CAD.
pub fn format_price(raw: &str) -> String {
    let raw = raw.trim();
    if CURRENCY_MARKERS.iter().any(|m| raw.contains(m)) {
        return raw.to_string();
    }
    match raw.parse::<f64>() {
        Ok(amount) => format!("CAD ${amount:.2}"),
        Err(_) => raw.to_string(),
    }
}

// ── Structured data ──────────────────────────────────────────────────────────

/// First JSON-LD node whose `@type` is `schema_type`.
///
/// Handles bare objects, top-level arrays and `@graph` lists. Blocks that do
/// not parse are skipped.
pub fn find_json_ld(document: &Html, schema_type: &str) -> Option<Value> {
    for script in all(document.root_element(), r#"script[type="application/ld+json"]"#) {
        let raw = script.text().collect::<String>();
        let data: Value = match serde_json::from_str(raw.trim()) {
            Ok(data) => data,
            Err(e) => {
                debug!("skipping malformed JSON-LD block: {}", e);
                continue;
            }
        };

        let candidates = match data {
            Value::Array(items) => items,
            Value::Object(mut obj) => match obj.remove("@graph") {
                Some(Value::Array(graph)) => graph,
                _ => vec![Value::Object(obj)],
            },
            _ => continue,
        };

        if let Some(node) = candidates.into_iter().find(|n| has_type(n, schema_type)) {
            return Some(node);
        }
    }
    None
}

fn has_type(node: &Value, schema_type: &str) -> bool {
    match node.get("@type") {
        Some(Value::String(t)) => t == schema_type,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(schema_type)),
        _ => false,
    }
}

/// String or number rendered as text; empty strings count as absent.
pub fn json_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Image field that may be a URL string, an `ImageObject` or a list of either.
pub fn json_image(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()).filter(|s| !s.is_empty()),
        Value::Object(obj) => json_text(obj.get("url")),
        Value::Array(items) => items.first().and_then(|i| json_image(Some(i))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn title_falls_back_through_og_and_title_tag() {
        let doc = Html::parse_document(
            r#"<html><head><title>Mystery Pattern | SewingShop</title>
            <meta property="og:title" content="Mystery Pattern"></head><body><p>x</p></body></html>"#,
        );
        assert_eq!(extract_title(&doc), "Mystery Pattern");

        let doc = Html::parse_document("<html><head><title>Just a Page</title></head><body></body></html>");
        assert_eq!(extract_title(&doc), "Just a Page");

        let doc = Html::parse_document("<html><body><h1>   </h1></body></html>");
        assert_eq!(extract_title(&doc), "Unknown");
    }

    #[test]
    fn price_prefers_metadata_with_currency() {
        let doc = Html::parse_document(
            r#"<html><head>
            <meta property="product:price:amount" content="14.99">
            <meta property="product:price:currency" content="USD">
            </head><body><span>$99.00</span></body></html>"#,
        );
        assert_eq!(extract_price(&doc).as_deref(), Some("14.99 USD"));
    }

    #[test]
    fn price_scans_text_for_symbols_either_side() {
        let doc = Html::parse_document("<p>Only <b>18,50 €</b> today</p>");
        assert_eq!(extract_price(&doc).as_deref(), Some("18,50 €"));

        let doc = Html::parse_document("<p>No price here, just 12 yards</p>");
        assert_eq!(extract_price(&doc), None);
    }

    #[test]
    fn price_keeps_thousands_separators() {
        let doc = Html::parse_document("<p>Dress form <b>$1,299.00</b></p>");
        assert_eq!(extract_price(&doc).as_deref(), Some("$1,299.00"));

        let doc = Html::parse_document("<p>Machine 1.049,95 €</p>");
        assert_eq!(extract_price(&doc).as_deref(), Some("1.049,95 €"));
    }

    #[test]
    fn image_skips_logos_and_data_uris() {
        let doc = Html::parse_document(
            r#"<body>
            <img src="data:image/png;base64,AAAA">
            <img src="/assets/site-logo.png">
            <img src="/a.gif">
            <img src="/images/blouse.jpg">
            </body>"#,
        );
        assert_eq!(
            extract_image(&doc, "https://example.com/pattern/1").as_deref(),
            Some("https://example.com/images/blouse.jpg")
        );
    }

    #[test]
    fn image_rewrites_protocol_relative() {
        let doc = Html::parse_document(r#"<body><img src="//cdn.example.com/p/dress.jpg"></body>"#);
        assert_eq!(
            extract_image(&doc, "http://example.com/").as_deref(),
            Some("https://cdn.example.com/p/dress.jpg")
        );
    }

    #[test]
    fn relative_og_image_is_resolved_against_page() {
        let doc = Html::parse_document(
            r#"<html><head><meta property="og:image" content="/images/cape.jpg"></head></html>"#,
        );
        assert_eq!(
            extract_image(&doc, "https://patterns.example/cape").as_deref(),
            Some("https://patterns.example/images/cape.jpg")
        );
    }

    #[test]
    fn absolutize_handles_each_shape() {
        let base = "https://tonitex.com";
        assert_eq!(absolutize(base, "https://x.com/a"), "https://x.com/a");
        assert_eq!(absolutize(base, "//cdn.x.com/a.jpg"), "https://cdn.x.com/a.jpg");
        assert_eq!(absolutize(base, "/en/wool-123.html"), "https://tonitex.com/en/wool-123.html");
        assert_eq!(
            absolutize("https://example.com/shop/item", "/img/a.jpg"),
            "https://example.com/img/a.jpg"
        );
    }

    #[test]
    fn format_price_normalizes_bare_decimals() {
        assert_eq!(format_price("12.99"), "CAD $12.99");
        assert_eq!(format_price("7"), "CAD $7.00");
        assert_eq!(format_price("$12.99"), "$12.99");
        assert_eq!(format_price("12.99 USD"), "12.99 USD");
        assert_eq!(format_price("N/A"), "N/A");
    }

    #[test]
    fn json_ld_found_in_graph_and_bad_blocks_skipped() {
        let doc = Html::parse_document(
            r#"<html><head>
            <script type="application/ld+json">{ not json </script>
            <script type="application/ld+json">
            {"@context": "https://schema.org", "@graph": [
                {"@type": "WebPage", "name": "page"},
                {"@type": "BlogPosting", "headline": "Peak Pencil Skirt"}
            ]}
            </script></head></html>"#,
        );
        let node = find_json_ld(&doc, "BlogPosting").unwrap();
        assert_eq!(node["headline"], "Peak Pencil Skirt");
        assert!(find_json_ld(&doc, "Product").is_none());
    }

    #[test]
    fn json_helpers_accept_loose_shapes() {
        assert_eq!(json_text(Some(&json!(10.47))).as_deref(), Some("10.47"));
        assert_eq!(json_text(Some(&json!(""))), None);
        assert_eq!(
            json_image(Some(&json!({"@type": "ImageObject", "url": "https://x.com/a.jpg"}))).as_deref(),
            Some("https://x.com/a.jpg")
        );
        assert_eq!(
            json_image(Some(&json!(["https://x.com/b.jpg"]))).as_deref(),
            Some("https://x.com/b.jpg")
        );
    }
}
