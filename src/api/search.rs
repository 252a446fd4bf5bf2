//! Catalog search, pattern detail and materials handlers

use serde::Serialize;

use super::{ApiResult, SearchRequest, UrlRequest, WebSearchRequest, require_query, require_web_url};
use crate::models::{FabricResult, PatternDetail, PatternMaterials, PatternSearchResult};
use crate::pattern_finder::PatternFinder;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourcesResponse {
    pub sources: Vec<&'static str>,
}

/// `GET /sources`
pub fn list_sources(finder: &PatternFinder) -> SourcesResponse {
    SourcesResponse {
        sources: finder.fabric_sources(),
    }
}

/// `GET /patterns/sources`
pub fn list_pattern_sources(finder: &PatternFinder) -> SourcesResponse {
    SourcesResponse {
        sources: finder.pattern_sources(),
    }
}

/// `POST /fabrics/search`
pub async fn search_fabrics(finder: &PatternFinder, req: &SearchRequest) -> ApiResult<Vec<FabricResult>> {
    let query = require_query(&req.query)?;
    let max_results = req.max_results.unwrap_or(finder.max_results());

    Ok(finder.search_fabrics(req.source.trim(), query, max_results).await?)
}

/// `POST /patterns/search`
pub async fn search_patterns(
    finder: &PatternFinder,
    req: &SearchRequest,
) -> ApiResult<Vec<PatternSearchResult>> {
    let query = require_query(&req.query)?;
    let max_results = req.max_results.unwrap_or(finder.max_results());

    Ok(finder.search_patterns(req.source.trim(), query, max_results).await?)
}

/// `POST /patterns/web-search`
pub async fn search_patterns_web(
    finder: &PatternFinder,
    req: &WebSearchRequest,
) -> ApiResult<Vec<PatternSearchResult>> {
    let query = require_query(&req.query)?;
    let max_results = req.max_results.unwrap_or(finder.max_results());

    Ok(finder.search_patterns_web(query, max_results).await?)
}

/// `GET /patterns/detail?url=`
pub async fn pattern_detail(finder: &PatternFinder, url: &str) -> ApiResult<PatternDetail> {
    let url = require_web_url(url)?;
    Ok(finder.pattern_detail(url).await?)
}

/// `POST /patterns/from-url`
pub async fn pattern_from_url(finder: &PatternFinder, req: &UrlRequest) -> ApiResult<PatternDetail> {
    pattern_detail(finder, &req.url).await
}

/// `POST /patterns/materials`
pub async fn pattern_materials(
    finder: &PatternFinder,
    req: &UrlRequest,
) -> ApiResult<PatternMaterials> {
    let url = require_web_url(&req.url)?;
    Ok(finder.materials_for_url(url).await?)
}

/// `GET /patterns/collections/{key}`
pub async fn pattern_collection(
    finder: &PatternFinder,
    key: &str,
) -> ApiResult<Vec<PatternSearchResult>> {
    Ok(finder.list_collection(key.trim()).await?)
}
