//! Error taxonomy for the ingestion pipeline
//!
//! Only I/O can fail: playlist parsing never errors. Fetch and store failures
//! inside the channel branches are absorbed by the loader; only `LoadError`
//! reaches route handlers.

use thiserror::Error;

/// Playlist HTTP retrieval failure
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid playlist URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {code}: {reason}")]
    Status { code: u16, reason: String },

    #[error("Playlist too large: {size_mb:.1}MB (limit {limit_mb}MB)")]
    TooLarge { size_mb: f64, limit_mb: usize },

    #[error("Failed to read playlist body: {0}")]
    Body(String),
}

/// Document store query or decode failure
#[derive(Debug, Error)]
pub enum StoreQueryError {
    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Malformed {collection} document {id}: {reason}")]
    Malformed {
        collection: &'static str,
        id: String,
        reason: String,
    },
}

impl From<sqlx::Error> for StoreQueryError {
    fn from(err: sqlx::Error) -> Self {
        StoreQueryError::Backend(err.to_string())
    }
}

/// User-visible outcome of a category load
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Category not found")]
    NotFound,

    #[error("Failed to load channels")]
    Failed(#[source] StoreQueryError),
}
