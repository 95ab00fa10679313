//! The single "get resource by path + query" primitive every blog
//! operation is built on, plus its reqwest-backed implementation.
//!
//! ## Caching
//! [`HttpTransport`] keeps successful responses in memory, keyed by path and
//! encoded query. Entries live until [`ContentTransport::flush_cache`] is
//! called; there is no TTL and no partial invalidation.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::config::BlogConfig;
use crate::error::TransportError;
use crate::query::StoryQuery;

/// A decoded delivery-API response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Value of the `total` response header, when the API sent one.
    pub total: Option<u64>,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, total: None, body }
    }

    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }
}

/// Fetch primitive. Implementations must be shareable across tasks so
/// that independent fetches can run concurrently.
#[async_trait]
pub trait ContentTransport: Send + Sync {
    async fn get(&self, path: &str, query: &StoryQuery) -> Result<ApiResponse, TransportError>;

    /// Drop every cached response. No-op for uncached transports.
    fn flush_cache(&self) {}
}

/// HTTP transport over reqwest with an optional in-memory response cache.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    token: String,
    cache: Option<Mutex<HashMap<String, ApiResponse>>>,
}

impl HttpTransport {
    pub fn new(config: &BlogConfig) -> Self {
        // Builder failure only happens when TLS backends are unavailable;
        // fall back to a default client rather than panicking.
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.access_token.clone(),
            cache: config.cache.enabled.then(|| Mutex::new(HashMap::new())),
        }
    }

    /// Number of cached responses; `0` when caching is disabled.
    pub fn cached_entries(&self) -> usize {
        self.cache
            .as_ref()
            .and_then(|c| c.lock().ok().map(|m| m.len()))
            .unwrap_or(0)
    }

    fn cache_key(path: &str, query: &StoryQuery) -> String {
        let encoded: Vec<String> = query
            .to_pairs()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        format!("{path}?{}", encoded.join("&"))
    }

    fn cached(&self, key: &str) -> Option<ApiResponse> {
        let cache = self.cache.as_ref()?;
        cache.lock().ok()?.get(key).cloned()
    }

    fn store(&self, key: String, response: &ApiResponse) {
        if let Some(cache) = &self.cache {
            if let Ok(mut map) = cache.lock() {
                map.insert(key, response.clone());
            }
        }
    }
}

#[async_trait]
impl ContentTransport for HttpTransport {
    async fn get(&self, path: &str, query: &StoryQuery) -> Result<ApiResponse, TransportError> {
        let key = Self::cache_key(path, query);
        if let Some(hit) = self.cached(&key) {
            debug!(path, "cache hit");
            return Ok(hit);
        }

        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut params = vec![("token".to_string(), self.token.clone())];
        params.extend(query.to_pairs());

        let resp = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| TransportError::Connect {
                url: url.clone(),
                detail: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let total = resp
            .headers()
            .get("total")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let bytes = resp.bytes().await.map_err(|e| TransportError::Connect {
            url: url.clone(),
            detail: e.to_string(),
        })?;
        let body: Value = serde_json::from_slice(&bytes).map_err(|e| TransportError::Json {
            field: "body".into(),
            detail: e.to_string(),
        })?;

        let response = ApiResponse {
            status: status.as_u16(),
            total,
            body,
        };
        self.store(key, &response);
        Ok(response)
    }

    fn flush_cache(&self) {
        if let Some(cache) = &self.cache {
            if let Ok(mut map) = cache.lock() {
                map.clear();
            }
        }
    }
}
