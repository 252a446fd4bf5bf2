use std::sync::Arc;

use tracing::info;

use crate::client::HttpClient;
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::models::{FabricResult, PatternDetail, PatternMaterials, PatternSearchResult, PurchaseLink};
use crate::scrapers::materials::{Cleanersupply, PrestaShopStore, ShopifySuggestStore, TheFabricClub};
use crate::scrapers::patterns::{
    BlackSnail, GenericScraper, LaughingMoon, MoodBlog, PatternWebSearch, Simplicity, TrulyVictorian,
};
use crate::search::{DuckDuckGo, MaterialSearch, WebMaterialSearch, WebSearch};
use crate::traits::{FabricScraper, PatternDetailScraper, PatternScraper};

/// Domain substrings that route a URL to a pattern adapter, first match wins.
pub const KNOWN_HOSTS: [(&str, &str); 4] = [
    ("simplicity.com", "simplicity"),
    ("blacksnailpatterns.com", "black_snail"),
    ("trulyvictorian.info", "truly_victorian"),
    ("moodfabrics.com", "mood"),
];

/// Owns every adapter and routes requests to them by source key or URL host.
///
/// Built once at startup; the registries are never mutated afterwards.
#[derive(Clone)]
pub struct PatternFinder {
    fabric_scrapers: Arc<Vec<Box<dyn FabricScraper>>>,
    pattern_scrapers: Arc<Vec<Box<dyn PatternScraper>>>,
    generic: GenericScraper,
    black_snail: Arc<BlackSnail>,
    web_patterns: PatternWebSearch,
    materials: Arc<dyn MaterialSearch>,
    max_results: usize,
}

impl PatternFinder {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = HttpClient::from_config(config)?;
        let web: Arc<dyn WebSearch> = Arc::new(DuckDuckGo::new(client.clone(), &config.web_search_url));

        let fabric_scrapers: Vec<Box<dyn FabricScraper>> = vec![
            Box::new(PrestaShopStore::tonitex(client.clone())),
            Box::new(ShopifySuggestStore::fabricville(client.clone())),
            Box::new(ShopifySuggestStore::spool_of_thread(client.clone())),
            Box::new(PrestaShopStore::fine_fabrics_canada(client.clone())),
            Box::new(TheFabricClub::new(client.clone())),
            Box::new(Cleanersupply::new(web.clone())),
        ];
        let pattern_scrapers: Vec<Box<dyn PatternScraper>> = vec![
            Box::new(Simplicity::new(client.clone())),
            Box::new(BlackSnail::new(client.clone())),
            Box::new(TrulyVictorian::new(client.clone())),
            Box::new(MoodBlog::new(client.clone())),
            Box::new(LaughingMoon::new(web.clone())),
        ];

        Ok(Self::from_parts(
            fabric_scrapers,
            pattern_scrapers,
            GenericScraper::new(client.clone()),
            BlackSnail::new(client),
            PatternWebSearch::new(web.clone()),
            Arc::new(WebMaterialSearch::new(web, config.links_per_material)),
        )
        .with_max_results(config.max_results))
    }

    /// Assemble a finder from explicit adapters, in registry order.
    pub fn from_parts(
        fabric_scrapers: Vec<Box<dyn FabricScraper>>,
        pattern_scrapers: Vec<Box<dyn PatternScraper>>,
        generic: GenericScraper,
        black_snail: BlackSnail,
        web_patterns: PatternWebSearch,
        materials: Arc<dyn MaterialSearch>,
    ) -> Self {
        info!(
            "Registered {} fabric sources and {} pattern sources",
            fabric_scrapers.len(),
            pattern_scrapers.len()
        );

        Self {
            fabric_scrapers: Arc::new(fabric_scrapers),
            pattern_scrapers: Arc::new(pattern_scrapers),
            generic,
            black_snail: Arc::new(black_snail),
            web_patterns,
            materials,
            max_results: AppConfig::default().max_results,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Result cap used when a search request does not set one.
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn fabric_sources(&self) -> Vec<&'static str> {
        self.fabric_scrapers.iter().map(|s| s.source()).collect()
    }

    pub fn pattern_sources(&self) -> Vec<&'static str> {
        self.pattern_scrapers.iter().map(|s| s.source()).collect()
    }

    fn fabric_scraper(&self, source: &str) -> Result<&dyn FabricScraper> {
        self.fabric_scrapers
            .iter()
            .find(|s| s.source() == source)
            .map(|s| s.as_ref())
            .ok_or_else(|| Error::UnknownSource {
                kind: "source",
                key: source.to_string(),
                valid: self.fabric_sources(),
            })
    }

    fn pattern_scraper(&self, source: &str) -> Result<&dyn PatternScraper> {
        self.pattern_scrapers
            .iter()
            .find(|s| s.source() == source)
            .map(|s| s.as_ref())
            .ok_or_else(|| Error::UnknownSource {
                kind: "pattern source",
                key: source.to_string(),
                valid: self.pattern_sources(),
            })
    }

    /// Adapter key of the first known host contained in `url`.
    pub fn route_host(url: &str) -> Option<&'static str> {
        KNOWN_HOSTS
            .iter()
            .find(|(host, _)| url.contains(host))
            .map(|(_, source)| *source)
    }

    /// Detail adapter for `url`, or the generic extractor when no known host
    /// claims it or the owning adapter is search-only.
    pub fn detail_scraper_for(&self, url: &str) -> &dyn PatternDetailScraper {
        Self::route_host(url)
            .and_then(|key| self.pattern_scraper(key).ok())
            .and_then(|scraper| scraper.detail_scraper())
            .unwrap_or(&self.generic)
    }

    pub async fn search_fabrics(
        &self,
        source: &str,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<FabricResult>> {
        let scraper = self.fabric_scraper(source)?;
        let results = scraper.search(query, max_results).await?;
        info!("{} returned {} fabrics for '{}'", source, results.len(), query);
        Ok(results)
    }

    pub async fn search_patterns(
        &self,
        source: &str,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<PatternSearchResult>> {
        let scraper = self.pattern_scraper(source)?;
        let results = scraper.search(query, max_results).await?;
        info!("{} returned {} patterns for '{}'", source, results.len(), query);
        Ok(results)
    }

    /// Pattern search across the big pattern houses, not tied to a registry key.
    pub async fn search_patterns_web(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<PatternSearchResult>> {
        let results = self.web_patterns.search(query, max_results).await?;
        info!("web search returned {} patterns for '{}'", results.len(), query);
        Ok(results)
    }

    pub async fn pattern_detail(&self, url: &str) -> Result<PatternDetail> {
        let scraper = self.detail_scraper_for(url);
        info!("Routing {} to {}", url, scraper.source());
        scraper.detail(url).await
    }

    /// Pattern detail plus purchase links for each of its materials.
    pub async fn materials_for_url(&self, url: &str) -> Result<PatternMaterials> {
        let pattern = self.pattern_detail(url).await?;
        let purchase_links = collect_purchase_links(&pattern, self.materials.as_ref()).await?;
        Ok(PatternMaterials {
            pattern,
            purchase_links,
        })
    }

    /// Run the materials search directly on caller-supplied strings.
    pub async fn find_materials(&self, materials: &[String]) -> Result<Vec<PurchaseLink>> {
        if materials.is_empty() {
            return Ok(Vec::new());
        }
        self.materials.search(materials).await
    }

    pub async fn list_collection(&self, key: &str) -> Result<Vec<PatternSearchResult>> {
        self.black_snail.list_collection(key).await
    }
}

pub async fn collect_purchase_links(
    detail: &PatternDetail,
    search: &dyn MaterialSearch,
) -> Result<Vec<PurchaseLink>> {
    let materials = detail.materials();
    if materials.is_empty() {
        info!("No materials listed for '{}'", detail.title);
        return Ok(Vec::new());
    }
    search.search(&materials).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    #[derive(Default)]
    struct RecordingSearch {
        calls: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl MaterialSearch for RecordingSearch {
        async fn search(&self, materials: &[String]) -> Result<Vec<PurchaseLink>> {
            self.calls.lock().unwrap().push(materials.to_vec());
            Ok(materials
                .iter()
                .map(|m| PurchaseLink {
                    material: m.clone(),
                    store: "Fabric Shop".into(),
                    url: format!("https://shop.example/{m}"),
                    snippet: None,
                })
                .collect())
        }
    }

    fn finder() -> PatternFinder {
        PatternFinder::new(&AppConfig::default()).unwrap()
    }

    #[test]
    fn registries_keep_declaration_order() {
        let finder = finder();
        assert_eq!(
            finder.fabric_sources(),
            [
                "tonitex",
                "fabricville",
                "spool_of_thread",
                "fine_fabrics_canada",
                "the_fabric_club",
                "cleanersupply"
            ]
        );
        assert_eq!(
            finder.pattern_sources(),
            ["simplicity", "black_snail", "truly_victorian", "mood", "laughing_moon"]
        );
    }

    #[test]
    fn known_hosts_route_regardless_of_path() {
        assert_eq!(
            PatternFinder::route_host("https://simplicity.com/mccalls/m8000?ref=x"),
            Some("simplicity")
        );
        assert_eq!(
            PatternFinder::route_host("https://www.blacksnailpatterns.com/products/corset"),
            Some("black_snail")
        );
        assert_eq!(
            PatternFinder::route_host("https://blog.moodfabrics.com/free-pattern/"),
            Some("mood")
        );
        assert_eq!(PatternFinder::route_host("https://etsy.com/listing/1"), None);
    }

    #[test]
    fn unknown_hosts_fall_back_to_generic() {
        let finder = finder();
        assert_eq!(
            finder.detail_scraper_for("https://trulyvictorian.info/shop/tv100/").source(),
            "truly_victorian"
        );
        assert_eq!(
            finder.detail_scraper_for("https://laughingmoonmercantile.com/x").source(),
            "custom"
        );
        assert_eq!(finder.detail_scraper_for("https://example.com/p").source(), "custom");
    }

    #[tokio::test]
    async fn unknown_source_names_valid_keys() {
        let err = finder().search_fabrics("nonexistent", "cotton", 10).await.unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("tonitex, fabricville"));

        let err = finder().search_patterns("burda", "dress", 10).await.unwrap_err();
        assert!(err.to_string().contains("laughing_moon"));
    }

    #[tokio::test]
    async fn materials_are_fabrics_then_notions() {
        let search = RecordingSearch::default();
        let mut detail = PatternDetail::minimal("simplicity", "Dress", "https://simplicity.com/x");
        detail.fabric_recommendations = vec!["wool".into()];
        detail.notions = vec!["thread".into()];

        let links = collect_purchase_links(&detail, &search).await.unwrap();

        assert_eq!(*search.calls.lock().unwrap(), [vec!["wool", "thread"]]);
        assert_eq!(links.len(), 2);
        assert_eq!(links[1].material, "thread");
    }

    #[tokio::test]
    async fn no_materials_means_no_search() {
        let search = RecordingSearch::default();
        let detail = PatternDetail::minimal("custom", "Cape", "https://example.com/cape");

        let links = collect_purchase_links(&detail, &search).await.unwrap();

        assert!(links.is_empty());
        assert!(search.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_materials_skips_empty_input() {
        let finder = finder();
        assert!(finder.find_materials(&[]).await.unwrap().is_empty());
    }
}
