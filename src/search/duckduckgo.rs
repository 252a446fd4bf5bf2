//! DuckDuckGo HTML endpoint (no JavaScript, no API key)

use async_trait::async_trait;
use scraper::Html;
use tracing::{debug, info};
use url::Url;

use super::{SearchHit, WebSearch};
use crate::client::HttpClient;
use crate::error::Result;
use crate::extract::{absolutize, all, attr, first, first_text, text_of};

pub struct DuckDuckGo {
    client: HttpClient,
    endpoint: String,
}

impl DuckDuckGo {
    pub fn new(client: HttpClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl WebSearch for DuckDuckGo {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        info!("Web search: {}", query);

        let html = self
            .client
            .get_text_with_query(&self.endpoint, &[("q", query)])
            .await?;

        Ok(parse_results(&html, max_results))
    }
}

/// Organic results in page order; ads and hits without title or link are dropped.
pub(crate) fn parse_results(html: &str, max_results: usize) -> Vec<SearchHit> {
    let document = Html::parse_document(html);

    all(document.root_element(), "div.result")
        .into_iter()
        .filter(|r| !r.value().classes().any(|c| c == "result--ad"))
        .filter_map(|result| {
            let link = first(result, "a.result__a")?;
            let title = text_of(link);
            let href = attr(link, "href")?;
            if title.is_empty() {
                debug!("search hit without title, skipping");
                return None;
            }

            Some(SearchHit {
                title,
                url: unwrap_redirect(&href),
                snippet: first_text(result, ".result__snippet"),
            })
        })
        .take(max_results)
        .collect()
}

/// Result links go through `/l/?uddg=<target>`; return the target itself.
fn unwrap_redirect(href: &str) -> String {
    let absolute = absolutize("https://duckduckgo.com", href);
    let Ok(url) = Url::parse(&absolute) else {
        return absolute;
    };

    if url.path() == "/l/"
        && let Some((_, target)) = url.query_pairs().find(|(k, _)| k == "uddg")
    {
        return target.into_owned();
    }
    absolute
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RESULTS_HTML: &str = r##"
    <div class="results">
      <div class="result results_links result--ad">
        <h2 class="result__title"><a class="result__a" href="https://ads.example/click">Sponsored</a></h2>
      </div>
      <div class="result results_links results_links_deep web-result">
        <h2 class="result__title">
          <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fcleanersupply.ca%2Fshoulder-pads&amp;rut=abc">Shoulder Pads | Cleaner's Supply</a>
        </h2>
        <a class="result__snippet" href="#">Raglan and set-in shoulder pads for tailoring.</a>
      </div>
      <div class="result results_links web-result">
        <h2 class="result__title"><a class="result__a" href="https://cleanersupply.ca/hem-tape">Hem Tape</a></h2>
      </div>
      <div class="result results_links web-result">
        <h2 class="result__title"><a class="result__a">No link</a></h2>
      </div>
    </div>
    "##;

    #[test]
    fn parses_organic_results_and_unwraps_redirects() {
        let hits = parse_results(RESULTS_HTML, 10);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Shoulder Pads | Cleaner's Supply");
        assert_eq!(hits[0].url, "https://cleanersupply.ca/shoulder-pads");
        assert_eq!(
            hits[0].snippet.as_deref(),
            Some("Raglan and set-in shoulder pads for tailoring.")
        );
        assert_eq!(hits[1].url, "https://cleanersupply.ca/hem-tape");
        assert_eq!(hits[1].snippet, None);
    }

    #[test]
    fn respects_max_results() {
        assert_eq!(parse_results(RESULTS_HTML, 1).len(), 1);
        assert!(parse_results("<html></html>", 5).is_empty());
    }

    #[tokio::test]
    async fn sends_query_to_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "site:cleanersupply.ca pads"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_HTML))
            .mount(&server)
            .await;

        let client = HttpClient::new("test", Duration::from_secs(5)).unwrap();
        let engine = DuckDuckGo::new(client, format!("{}/html/", server.uri()));
        let hits = engine.search("site:cleanersupply.ca pads", 3).await.unwrap();

        assert_eq!(hits.len(), 2);
    }
}
