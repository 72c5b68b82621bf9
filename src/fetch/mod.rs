//! HTTP fetching with caching.
//!
//! Downloads source tables and keeps them in the local cache directory so
//! the reference build can be re-run offline. Each cached file gets a
//! `.meta.json` sidecar recording where and when it was fetched.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rate limited by {host}, retry after {retry_after_secs}s")]
    RateLimited { host: String, retry_after_secs: u64 },

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Content too large: {size} bytes (max {max_size})")]
    ContentTooLarge { size: usize, max_size: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Path where content is cached
    pub cache_path: PathBuf,

    /// Content length in bytes
    pub content_length: usize,

    /// Whether this was served from cache
    pub from_cache: bool,
}

/// Metadata stored alongside cached content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub url: String,
    pub fetched_at: DateTime<Utc>,
    pub content_length: usize,
    /// Hex SHA256 of the cached bytes
    pub sha256: String,
    pub last_modified: Option<String>,
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Maximum content size to fetch (default 50MB)
    pub max_content_size: usize,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_content_size: 50 * 1024 * 1024, // 50MB
            timeout: Duration::from_secs(30),
            user_agent: format!("roster-lens/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP fetcher writing into a local cache.
pub struct Fetcher {
    client: Client,
    config: FetcherConfig,
}

impl Fetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("roster-lens")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a fetcher with default configuration.
    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(FetcherConfig::default())
    }

    /// Shared HTTP client, for callers that need plain requests.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Fetch `url` into `cache_path` unless it is already cached.
    /// `force` always goes to the network.
    pub async fn fetch_cached(
        &self,
        url: &Url,
        cache_path: &Path,
        force: bool,
    ) -> Result<FetchResult, FetchError> {
        if !force {
            if let Ok(meta) = fs::metadata(cache_path).await {
                debug!("Serving {} from cache", url);
                return Ok(FetchResult {
                    cache_path: cache_path.to_path_buf(),
                    content_length: meta.len() as usize,
                    from_cache: true,
                });
            }
        }

        self.fetch_and_cache(url, cache_path).await
    }

    /// Fetch from network and cache the result.
    async fn fetch_and_cache(&self, url: &Url, cache_path: &Path) -> Result<FetchResult, FetchError> {
        info!("Fetching {}", url);

        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            return Err(FetchError::RateLimited {
                host: url.host_str().unwrap_or("unknown").to_string(),
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let last_modified = response
            .headers()
            .get("last-modified")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let content = response.bytes().await?;

        if content.len() > self.config.max_content_size {
            return Err(FetchError::ContentTooLarge {
                size: content.len(),
                max_size: self.config.max_content_size,
            });
        }

        // Ensure cache directory exists
        if let Some(parent) = cache_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(cache_path).await?;
        file.write_all(&content).await?;
        file.flush().await?;

        let meta = CacheMetadata {
            url: url.to_string(),
            fetched_at: Utc::now(),
            content_length: content.len(),
            sha256: content_hash(&content),
            last_modified,
        };
        let meta_json = serde_json::to_string_pretty(&meta)?;
        fs::write(Self::meta_path(cache_path), meta_json).await?;

        Ok(FetchResult {
            cache_path: cache_path.to_path_buf(),
            content_length: content.len(),
            from_cache: false,
        })
    }

    /// Sidecar metadata path for a cached file.
    pub fn meta_path(cache_path: &Path) -> PathBuf {
        let mut name = cache_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".meta.json");
        cache_path.with_file_name(name)
    }

    /// Read the sidecar metadata for a cached file, if present.
    pub async fn read_metadata(cache_path: &Path) -> Option<CacheMetadata> {
        let text = fs::read_to_string(Self::meta_path(cache_path)).await.ok()?;
        serde_json::from_str(&text).ok()
    }

    /// Read cached content as string.
    pub async fn read_cached_text(&self, result: &FetchResult) -> Result<String, FetchError> {
        Ok(fs::read_to_string(&result.cache_path).await?)
    }
}

/// Hex SHA256 of a byte slice.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_content_hash() {
        let a = content_hash(b"id|name|\r\n");
        let b = content_hash(b"id|name|\r\nSM|Space Marines|\r\n");

        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_meta_path() {
        let path = PathBuf::from("/cache/factions.csv");
        assert_eq!(
            Fetcher::meta_path(&path),
            PathBuf::from("/cache/factions.csv.meta.json")
        );
    }

    #[tokio::test]
    async fn test_cached_file_is_not_refetched() {
        let temp_dir = TempDir::new().unwrap();
        let cache_path = temp_dir.path().join("factions.csv");
        fs::write(&cache_path, "id|name|\r\n").await.unwrap();

        let fetcher = Fetcher::with_defaults().unwrap();
        // Unroutable URL: any network access would fail the test
        let url = Url::parse("http://127.0.0.1:9/Factions.csv").unwrap();
        let result = fetcher.fetch_cached(&url, &cache_path, false).await.unwrap();

        assert!(result.from_cache);
        assert_eq!(result.content_length, 10);
        assert_eq!(
            fetcher.read_cached_text(&result).await.unwrap(),
            "id|name|\r\n"
        );
    }

    #[tokio::test]
    async fn test_cache_metadata_serialization() {
        let meta = CacheMetadata {
            url: "http://example.com/Factions.csv".to_string(),
            fetched_at: Utc::now(),
            content_length: 1234,
            sha256: content_hash(b"x"),
            last_modified: None,
        };

        let json = serde_json::to_string(&meta).unwrap();
        let parsed: CacheMetadata = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.url, meta.url);
        assert_eq!(parsed.content_length, meta.content_length);
    }

    #[test]
    fn test_fetcher_config_default() {
        let config = FetcherConfig::default();

        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("roster-lens/"));
    }
}
