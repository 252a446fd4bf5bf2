//! Error types for the pattern finder.
//!
//! Adapters and the dispatcher return [`Error`]; the binary wraps it in
//! `anyhow` and the [`crate::api`] layer maps it onto HTTP status codes.

/// Top-level error type for scraping, dispatch and storage operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller supplied an empty or malformed value.
    #[error("{0}")]
    InvalidInput(String),

    /// A source or collection key outside the closed registry.
    #[error("Unknown {kind} '{key}'. Valid: {}", valid.join(", "))]
    UnknownSource {
        kind: &'static str,
        key: String,
        valid: Vec<&'static str>,
    },

    /// Connection failure, timeout or body read error.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status.
    #[error("{url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Top-level payload could not be decoded.
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an input error from any displayable message.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// True for errors caused by the caller rather than by an upstream site.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::UnknownSource { .. })
    }
}
