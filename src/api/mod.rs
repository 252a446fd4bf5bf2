//! Request handlers behind the pattern-finder endpoints.
//!
//! Every handler validates its input, calls into the finder, the store
//! lookup or the project database, and reports failures as an [`ApiError`]
//! carrying the HTTP status the endpoint answers with.

mod projects;
mod search;
mod stores;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;

pub use projects::*;
pub use search::*;
pub use stores::*;

/// Failure as seen by an API client
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{status}: {detail}")]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Http(_) | Error::Status { .. } | Error::Json(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self {
            status,
            detail: err.to_string(),
        }
    }
}

/// Body of the search endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub source: String,
    pub max_results: Option<usize>,
}

/// Body of the source-less pattern web search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebSearchRequest {
    pub query: String,
    pub max_results: Option<usize>,
}

/// Body of the URL-driven pattern endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UrlRequest {
    pub url: String,
}

/// Acknowledgement for delete endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deleted {
    pub deleted: i64,
}

fn require_query(query: &str) -> Result<&str, Error> {
    let query = query.trim();
    if query.is_empty() {
        return Err(Error::invalid("query must not be empty"));
    }
    Ok(query)
}

/// Trimmed `url`, which must be an absolute http(s) URL.
fn require_web_url(url: &str) -> Result<&str, Error> {
    let url = url.trim();
    if url.is_empty() {
        return Err(Error::invalid("url must not be empty"));
    }
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(url),
        _ => Err(Error::invalid(format!("url must be an http(s) URL, got '{url}'"))),
    }
}
