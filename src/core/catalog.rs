//! Movie-metadata catalog client.
//!
//! Every read goes through a [`ResponseCache`] keyed by the full request
//! URL. Query parameters are kept sorted, so two requests with the same
//! endpoint and parameters share one cache entry regardless of the order
//! the parameters were added in.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::config::{CatalogConfig, DETAILS_APPEND, placeholders};
use crate::core::cache::ResponseCache;
use crate::core::error::FetchError;
use crate::models::{MediaKind, SearchScope, TimeWindow, Trailer, TrendingScope, Video};
use crate::utils::Clock;

// =============================================================================
// Transport
// =============================================================================

/// Performs the actual `GET` for a catalog URL.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;
}

// =============================================================================
// Request
// =============================================================================

/// An endpoint plus its query parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CatalogRequest {
    endpoint: String,
    params: BTreeMap<String, String>,
}

impl CatalogRequest {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            params: BTreeMap::new(),
        }
    }

    /// Set a query parameter, replacing an earlier value for `key`.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Set `key` only if the caller has not.
    fn default_param(mut self, key: &str, value: &str) -> Self {
        self.params
            .entry(key.to_string())
            .or_insert_with(|| value.to_string());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Percent-encoded query string with keys in sorted order.
    pub fn query(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Full URL under `base_url`. Also serves as the cache key.
    pub fn url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        if self.params.is_empty() {
            format!("{}{}", base, self.endpoint)
        } else {
            format!("{}{}?{}", base, self.endpoint, self.query())
        }
    }
}

impl fmt::Display for CatalogRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url(""))
    }
}

// =============================================================================
// Client
// =============================================================================

/// Cached reads against the catalog API.
pub struct CatalogClient<T> {
    transport: T,
    cache: ResponseCache<Value>,
    config: CatalogConfig,
}

impl<T: Transport> CatalogClient<T> {
    pub fn new(transport: T, clock: Rc<dyn Clock>) -> Self {
        Self::with_config(transport, clock, CatalogConfig::default())
    }

    pub fn with_config(transport: T, clock: Rc<dyn Clock>, config: CatalogConfig) -> Self {
        Self {
            transport,
            cache: ResponseCache::new(config.cache_ttl_ms, clock),
            config,
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Drop all cached responses.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Fetch a request, serving a fresh cached response when there is one.
    ///
    /// `api_key` and `language` are added unless the request sets them.
    pub async fn fetch(&self, request: CatalogRequest) -> Result<Value, FetchError> {
        tracing::debug!(%request, "catalog read");
        let request = request
            .default_param("api_key", &self.config.api_key)
            .default_param("language", &self.config.language);
        let url = request.url(&self.config.base_url);

        self.cache
            .get_or_fetch(&url, || self.transport.get_json(&url))
            .await
    }

    // =========================================================================
    // Lists
    // =========================================================================

    pub async fn popular_movies(&self, page: u32) -> Result<Value, FetchError> {
        self.fetch(CatalogRequest::new("/movie/popular").param("page", page))
            .await
    }

    pub async fn popular_tv(&self, page: u32) -> Result<Value, FetchError> {
        self.fetch(CatalogRequest::new("/tv/popular").param("page", page))
            .await
    }

    pub async fn now_playing(&self, page: u32) -> Result<Value, FetchError> {
        self.fetch(CatalogRequest::new("/movie/now_playing").param("page", page))
            .await
    }

    pub async fn top_rated(&self, page: u32) -> Result<Value, FetchError> {
        self.fetch(CatalogRequest::new("/movie/top_rated").param("page", page))
            .await
    }

    pub async fn upcoming(&self) -> Result<Value, FetchError> {
        self.fetch(CatalogRequest::new("/movie/upcoming")).await
    }

    pub async fn airing_today(&self) -> Result<Value, FetchError> {
        self.fetch(CatalogRequest::new("/tv/airing_today")).await
    }

    pub async fn trending(
        &self,
        scope: TrendingScope,
        window: TimeWindow,
    ) -> Result<Value, FetchError> {
        self.fetch(CatalogRequest::new(format!("/trending/{}/{}", scope, window)))
            .await
    }

    pub async fn search(
        &self,
        query: &str,
        scope: SearchScope,
        page: u32,
    ) -> Result<Value, FetchError> {
        self.fetch(
            CatalogRequest::new(format!("/search/{}", scope))
                .param("query", query)
                .param("page", page),
        )
        .await
    }

    /// `/discover/movie` with arbitrary filters (`with_genres`, `sort_by`, ...).
    pub async fn discover_movies<I, K, V>(&self, filters: I) -> Result<Value, FetchError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let request = filters
            .into_iter()
            .fold(CatalogRequest::new("/discover/movie"), |req, (k, v)| req.param(k, v));
        self.fetch(request).await
    }

    pub async fn genres(&self, kind: MediaKind) -> Result<Value, FetchError> {
        self.fetch(CatalogRequest::new(format!("/genre/{}/list", kind)))
            .await
    }

    // =========================================================================
    // Details
    // =========================================================================

    /// Details with videos, credits, similar titles and recommendations.
    pub async fn details(&self, id: u64, kind: MediaKind) -> Result<Value, FetchError> {
        self.fetch(
            CatalogRequest::new(format!("/{}/{}", kind, id))
                .param("append_to_response", DETAILS_APPEND),
        )
        .await
    }

    pub async fn movie_details(&self, id: u64) -> Result<Value, FetchError> {
        self.details(id, MediaKind::Movie).await
    }

    pub async fn tv_details(&self, id: u64) -> Result<Value, FetchError> {
        self.details(id, MediaKind::Series).await
    }

    // =========================================================================
    // Artwork & Trailers
    // =========================================================================

    pub fn poster_url(&self, path: Option<&str>, size: &str) -> String {
        self.image_url(path, size, placeholders::POSTER)
    }

    pub fn backdrop_url(&self, path: Option<&str>, size: &str) -> String {
        self.image_url(path, size, placeholders::BACKDROP)
    }

    fn image_url(&self, path: Option<&str>, size: &str, fallback: &str) -> String {
        match path.filter(|p| !p.is_empty()) {
            Some(path) => format!("{}{}{}", self.config.image_base_url, size, path),
            None => fallback.to_string(),
        }
    }

    /// YouTube trailers listed in a details response.
    pub fn trailers(&self, details: &Value) -> Vec<Trailer> {
        let Some(results) = details.pointer("/videos/results").and_then(Value::as_array) else {
            return Vec::new();
        };

        results
            .iter()
            .filter_map(|v| serde_json::from_value::<Video>(v.clone()).ok())
            .filter(Video::is_youtube_trailer)
            .map(|v| Trailer {
                url: format!("{}{}", self.config.video_base_url, v.key),
                name: v.name,
                key: v.key,
            })
            .collect()
    }
}
