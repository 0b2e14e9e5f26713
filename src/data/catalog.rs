//! TMDB catalog client
//!
//! This module provides `MovieClient`, which fetches trending, popular, search
//! and details responses from the TMDB REST API and keeps them in an in-memory
//! cache for a short time. Failures are returned as typed `CatalogError`s; the
//! client itself never retries (see [`crate::retry`]).

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use super::images::image_url;
use super::{Movie, MovieDetails, MoviePage, TimeWindow};
use crate::cache::{Clock, QueryKey, ResponseCache};
use crate::config::{Config, ConfigError};

/// Sections appended to a details response
const DETAILS_APPEND: &str = "credits,videos";

/// Broad category of a `CatalogError`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    Remote,
    Network,
    Parse,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::Remote => "remote error",
            ErrorKind::Network => "network error",
            ErrorKind::Parse => "parse error",
        };
        f.write_str(name)
    }
}

/// Errors that can occur when fetching catalog data
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Local input was rejected before any request was made
    #[error("{operation}: {message}")]
    InvalidArgument {
        operation: &'static str,
        message: String,
    },

    /// The API answered with a status outside 200-299
    #[error("{operation} ({query}) failed with HTTP status {status}")]
    Remote {
        operation: &'static str,
        query: String,
        status: u16,
    },

    /// No response was received (DNS, connect, timeout, truncated body)
    #[error("{operation} ({query}) request failed: {source}")]
    Network {
        operation: &'static str,
        query: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not the expected JSON
    #[error("{operation} ({query}) returned an unexpected body: {source}")]
    Parse {
        operation: &'static str,
        query: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CatalogError {
    /// Coarse category of the failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            CatalogError::Remote { .. } => ErrorKind::Remote,
            CatalogError::Network { .. } => ErrorKind::Network,
            CatalogError::Parse { .. } => ErrorKind::Parse,
        }
    }

    /// Name of the client operation that failed
    pub fn operation(&self) -> &'static str {
        match self {
            CatalogError::InvalidArgument { operation, .. }
            | CatalogError::Remote { operation, .. }
            | CatalogError::Network { operation, .. }
            | CatalogError::Parse { operation, .. } => operation,
        }
    }

    /// HTTP status for remote errors
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether repeating the same call could plausibly succeed.
    ///
    /// Network failures, request timeouts, rate limiting and server errors are
    /// retryable; bad input, other client errors and malformed bodies are not.
    /// Pass this to [`crate::retry::with_retry_if`] to skip pointless retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::Network { .. } => true,
            CatalogError::Remote { status, .. } => {
                matches!(*status, 408 | 429) || *status >= 500
            }
            CatalogError::InvalidArgument { .. } | CatalogError::Parse { .. } => false,
        }
    }
}

/// A payload as held by the response cache
#[derive(Debug, Clone)]
enum CachedResponse {
    Page(Arc<MoviePage>),
    Details(Arc<MovieDetails>),
}

/// Payload types that can be stored in and read back from the cache
trait CachedPayload: DeserializeOwned + Sized {
    fn into_cached(payload: Arc<Self>) -> CachedResponse;
    fn from_cached(cached: CachedResponse) -> Option<Arc<Self>>;
}

impl CachedPayload for MoviePage {
    fn into_cached(payload: Arc<Self>) -> CachedResponse {
        CachedResponse::Page(payload)
    }

    fn from_cached(cached: CachedResponse) -> Option<Arc<Self>> {
        match cached {
            CachedResponse::Page(page) => Some(page),
            CachedResponse::Details(_) => None,
        }
    }
}

impl CachedPayload for MovieDetails {
    fn into_cached(payload: Arc<Self>) -> CachedResponse {
        CachedResponse::Details(payload)
    }

    fn from_cached(cached: CachedResponse) -> Option<Arc<Self>> {
        match cached {
            CachedResponse::Details(details) => Some(details),
            CachedResponse::Page(_) => None,
        }
    }
}

/// Client for the TMDB movie catalog with a short-lived response cache
///
/// Cloning the client shares both the HTTP connection pool and the cache.
#[derive(Debug, Clone)]
pub struct MovieClient {
    /// HTTP client for making requests
    http_client: Client,
    /// API key sent with every request
    api_key: String,
    /// REST API base URL (allows override for testing)
    base_url: String,
    /// Image CDN base URL
    image_base_url: String,
    /// Optional `language` query parameter
    language: Option<String>,
    /// Responses keyed by query identity
    cache: ResponseCache<CachedResponse>,
}

impl MovieClient {
    /// Creates a client from configuration
    ///
    /// Fails if no API key is configured, the cache TTL is out of range, or the
    /// HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let api_key = config.require_api_key()?.to_string();
        let ttl = config.cache_ttl()?;
        let http_client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("moviecat/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.clone(),
            language: config.language.clone(),
            cache: ResponseCache::with_ttl(ttl),
        })
    }

    /// Creates a client with a custom HTTP client, API key and base URL
    pub fn with_client(
        client: Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let config = Config::default();
        let base_url: String = base_url.into();
        Self {
            http_client: client,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: ResponseCache::new(),
            image_base_url: config.image_base_url,
            language: None,
        }
    }

    /// Replaces the time source used by the cache
    ///
    /// Drops any cached entries, since they were stamped by the previous clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.cache = ResponseCache::with_ttl(self.cache.ttl()).with_clock(clock);
        self
    }

    /// Trending movies for the given time window
    pub async fn get_trending(&self, window: TimeWindow) -> Result<Arc<MoviePage>, CatalogError> {
        let key = QueryKey::Trending { window };
        let path = format!("/trending/movie/{}", window.as_str());
        self.fetch_cached(&key, &path, Vec::new()).await
    }

    /// One page of popular movies
    pub async fn get_popular_movies(&self, page: u32) -> Result<Arc<MoviePage>, CatalogError> {
        let key = QueryKey::Popular { page };
        let params = vec![("page", page.to_string())];
        self.fetch_cached(&key, "/movie/popular", params).await
    }

    /// Searches movies by title
    ///
    /// Fails with `InvalidArgument` for an empty or whitespace-only query without
    /// touching the network. Surrounding whitespace is trimmed before sending.
    pub async fn search_movies(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Arc<MoviePage>, CatalogError> {
        let trimmed = query.trim();
        let key = QueryKey::search(trimmed, page);

        if trimmed.is_empty() {
            return Err(CatalogError::InvalidArgument {
                operation: key.operation(),
                message: "search query cannot be empty".to_string(),
            });
        }

        let params = vec![("query", trimmed.to_string()), ("page", page.to_string())];
        self.fetch_cached(&key, "/search/movie", params).await
    }

    /// Full details for a movie, with credits and videos appended
    pub async fn get_movie_details(&self, id: u64) -> Result<Arc<MovieDetails>, CatalogError> {
        let key = QueryKey::Details { id };
        let path = format!("/movie/{}", id);
        let params = vec![("append_to_response", DETAILS_APPEND.to_string())];
        self.fetch_cached(&key, &path, params).await
    }

    /// Full image URL for `path` using the configured image CDN
    ///
    /// Returns `None` when `path` is absent or empty; `size` defaults to `w500`.
    pub fn image_url(&self, path: Option<&str>, size: Option<&str>) -> Option<String> {
        image_url(&self.image_base_url, path, size)
    }

    /// Poster URL for a movie
    pub fn poster_url(&self, movie: &Movie, size: Option<&str>) -> Option<String> {
        self.image_url(movie.poster_path.as_deref(), size)
    }

    /// Drops every cached response so the next call of each operation hits the network
    pub fn clear_cache(&self) {
        tracing::debug!(entries = self.cache.len(), "clearing response cache");
        self.cache.clear();
    }

    /// Number of occupied cache slots, including expired ones
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    /// Cache-first fetch shared by every operation
    async fn fetch_cached<T: CachedPayload>(
        &self,
        key: &QueryKey,
        path: &str,
        params: Vec<(&'static str, String)>,
    ) -> Result<Arc<T>, CatalogError> {
        let cache_key = key.cache_key();

        if let Some(hit) = self
            .cache
            .get(&cache_key)
            .and_then(|entry| T::from_cached(entry.payload))
        {
            tracing::debug!(key = %cache_key, "cache hit");
            return Ok(hit);
        }
        tracing::debug!(key = %cache_key, "cache miss");

        let payload = match self.fetch_from_api::<T>(key, path, params).await {
            Ok(payload) => Arc::new(payload),
            Err(err) => {
                tracing::warn!(
                    operation = key.operation(),
                    query = %key.description(),
                    error = %err,
                    "catalog request failed"
                );
                return Err(err);
            }
        };

        self.cache.put(cache_key, T::into_cached(Arc::clone(&payload)));
        Ok(payload)
    }

    /// Fetches and decodes a response directly from the API
    async fn fetch_from_api<T: DeserializeOwned>(
        &self,
        key: &QueryKey,
        path: &str,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "requesting");

        params.push(("api_key", self.api_key.clone()));
        if let Some(ref language) = self.language {
            params.push(("language", language.clone()));
        }

        let network_error = |source: reqwest::Error| CatalogError::Network {
            operation: key.operation(),
            query: key.description(),
            source,
        };

        let response = self
            .http_client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Remote {
                operation: key.operation(),
                query: key.description(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(network_error)?;

        serde_json::from_slice(&body).map_err(|source| CatalogError::Parse {
            operation: key.operation(),
            query: key.description(),
            source,
        })
    }
}
