//! Playlist retrieval over HTTP
//!
//! One GET per call: no retries, and no timeout unless one is configured.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::error::FetchError;

/// Source of raw playlist text
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// reqwest-backed playlist fetcher
pub struct HttpPlaylistFetcher {
    client: Client,
    max_playlist_size_mb: usize,
}

impl HttpPlaylistFetcher {
    /// Create a new fetcher
    pub fn new(
        user_agent: &str,
        timeout_ms: Option<u64>,
        max_playlist_size_mb: usize,
    ) -> Result<Self, FetchError> {
        let mut builder = Client::builder().user_agent(user_agent).gzip(true);
        if let Some(ms) = timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_playlist_size_mb,
        })
    }

    fn max_bytes(&self) -> u64 {
        (self.max_playlist_size_mb as u64).saturating_mul(1024 * 1024)
    }

    fn too_large(&self, bytes: u64) -> FetchError {
        FetchError::TooLarge {
            size_mb: bytes as f64 / 1024f64 / 1024f64,
            limit_mb: self.max_playlist_size_mb,
        }
    }
}

/// Accept only absolute http(s) URLs
fn validate_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw.trim()).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::InvalidUrl(format!("unsupported scheme `{}`", other))),
    }
}

#[async_trait]
impl PlaylistSource for HttpPlaylistFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let url = validate_url(url)?;
        tracing::debug!("Fetching playlist: {}", url);

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let reason = status
                .canonical_reason()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "Error".to_string());
            return Err(FetchError::Status {
                code: status.as_u16(),
                reason,
            });
        }

        let max_bytes = self.max_bytes();
        if let Some(len) = response.content_length() {
            if len > max_bytes {
                return Err(self.too_large(len));
            }
        }

        // Content-Length can be absent or wrong, so enforce the cap while reading
        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?
        {
            body.extend_from_slice(&chunk);
            if body.len() as u64 > max_bytes {
                return Err(self.too_large(body.len() as u64));
            }
        }

        tracing::info!("Playlist fetched: {:.2} KB", body.len() as f64 / 1024.0);

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn fetcher(max_mb: usize) -> HttpPlaylistFetcher {
        HttpPlaylistFetcher::new("test-agent", Some(5_000), max_mb).unwrap()
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("http://example.com/list.m3u").is_ok());
        assert!(validate_url("https://example.com/list.m3u").is_ok());
        assert!(matches!(validate_url("not a url"), Err(FetchError::InvalidUrl(_))));
        assert!(matches!(validate_url("ftp://example.com/x"), Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn test_max_bytes_saturates() {
        assert_eq!(fetcher(2).max_bytes(), 2 * 1024 * 1024);
        assert_eq!(fetcher(usize::MAX).max_bytes(), u64::MAX);
    }

    #[tokio::test]
    async fn test_fetch_ok() {
        let app = Router::new().route("/list.m3u", get(|| async { "#EXTM3U\n#EXTINF:-1,A\nhttp://s/a\n" }));
        let base = serve(app).await;

        let text = fetcher(1).fetch(&format!("{}/list.m3u", base)).await.unwrap();
        assert!(text.starts_with("#EXTM3U"));
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let app = Router::new().route("/gone", get(|| async { (StatusCode::NOT_FOUND, "nope") }));
        let base = serve(app).await;

        let err = fetcher(1).fetch(&format!("{}/gone", base)).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { code: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_too_large() {
        let app = Router::new().route("/big", get(|| async { "x".repeat(2 * 1024 * 1024) }));
        let base = serve(app).await;

        let err = fetcher(1).fetch(&format!("{}/big", base)).await.unwrap_err();
        assert!(matches!(err, FetchError::TooLarge { limit_mb: 1, .. }));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = fetcher(1).fetch(&format!("http://{}/list.m3u", addr)).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }
}
