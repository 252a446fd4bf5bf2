//! Runtime configuration loaded from `.env` and the process environment.

use std::env;
use std::str::FromStr;

const ENV_PREFIX: &str = "PATTERN_FINDER_";

/// Desktop browser user agent; several stores serve empty pages to unknown agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub user_agent: String,
    /// Timeout applied to every page/API fetch.
    pub http_timeout_secs: u64,
    /// Timeout for the Overpass geospatial query.
    pub overpass_timeout_secs: u64,
    pub overpass_url: String,
    pub web_search_url: String,
    /// Default result cap for catalog searches.
    pub max_results: usize,
    /// Purchase-link candidates kept per material.
    pub links_per_material: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:database/pattern_finder.db".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_timeout_secs: 15,
            overpass_timeout_secs: 30,
            overpass_url: "https://overpass-api.de/api/interpreter".to_string(),
            web_search_url: "https://html.duckduckgo.com/html/".to_string(),
            max_results: 10,
            links_per_material: 3,
        }
    }
}

impl AppConfig {
    /// Load `.env` (if present) and apply `PATTERN_FINDER_*` overrides on top of the defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}")).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            database_url: var("DATABASE_URL").unwrap_or(defaults.database_url),
            user_agent: var("USER_AGENT").unwrap_or(defaults.user_agent),
            http_timeout_secs: parse_or(var("HTTP_TIMEOUT_SECS"), defaults.http_timeout_secs),
            overpass_timeout_secs: parse_or(
                var("OVERPASS_TIMEOUT_SECS"),
                defaults.overpass_timeout_secs,
            ),
            overpass_url: var("OVERPASS_URL").unwrap_or(defaults.overpass_url),
            web_search_url: var("WEB_SEARCH_URL").unwrap_or(defaults.web_search_url),
            max_results: parse_or(var("MAX_RESULTS"), defaults.max_results),
            links_per_material: parse_or(var("LINKS_PER_MATERIAL"), defaults.links_per_material),
        }
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
