// ── Query cache ──
//
// Lock-free store of fetched query results keyed by API path, with
// push-based invalidation through a `broadcast` channel.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use laptoppos_api::QueryClient;
use tokio::sync::broadcast;
use tracing::debug;

use crate::error::CoreError;
use crate::invalidation::CacheController;

const INVALIDATION_CHANNEL_CAPACITY: usize = 256;

/// One cached query result.
#[derive(Debug, Clone)]
pub struct CachedQuery {
    pub value: Arc<serde_json::Value>,
    pub fetched_at: DateTime<Utc>,
    /// Set by invalidation, cleared by the next [`QueryCache::put`].
    pub stale: bool,
}

/// In-process query cache the live channel invalidates.
///
/// Invalidating a key marks its entry stale and publishes the key to
/// every [`subscribe`](Self::subscribe)r, whether or not an entry exists,
/// so a consumer can decide to fetch it for the first time.
pub struct QueryCache {
    entries: DashMap<String, CachedQuery>,
    invalidated: broadcast::Sender<String>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        let (invalidated, _) = broadcast::channel(INVALIDATION_CHANNEL_CAPACITY);
        Self {
            entries: DashMap::new(),
            invalidated,
        }
    }

    /// Store a fresh result under `key`.
    pub fn put(&self, key: impl Into<String>, value: serde_json::Value) {
        self.entries.insert(
            key.into(),
            CachedQuery {
                value: Arc::new(value),
                fetched_at: Utc::now(),
                stale: false,
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<CachedQuery> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// `true` if `key` is missing or has been invalidated since its last fetch.
    pub fn is_stale(&self, key: &str) -> bool {
        self.entries.get(key).is_none_or(|entry| entry.stale)
    }

    pub fn remove(&self, key: &str) -> Option<CachedQuery> {
        self.entries.remove(key).map(|(_, entry)| entry)
    }

    /// Receive every invalidated key from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.invalidated.subscribe()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Refetch `key` through `client` and store the result.
    ///
    /// Transient failures are retried once. A query the server no longer
    /// knows is dropped from the cache.
    pub async fn refresh(&self, client: &QueryClient, key: &str) -> Result<(), CoreError> {
        let fetched = match client.fetch(key).await {
            Err(e) if e.is_transient() => {
                debug!(key, error = %e, "transient fetch failure, retrying once");
                client.fetch(key).await
            }
            other => other,
        };

        match fetched {
            Ok(value) => {
                self.put(key, value);
                debug!(key, "query refreshed");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                self.remove(key);
                Err(CoreError::QueryNotFound { key: key.into() })
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl CacheController for QueryCache {
    fn invalidate(&self, key: &str) {
        if let Some(mut entry) = self.entries.get_mut(key) {
            entry.stale = true;
        }
        // No subscribers is fine
        let _ = self.invalidated.send(key.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn invalidate_marks_entry_stale() {
        let cache = QueryCache::new();
        cache.put("/api/products", json!([{ "sku": "TP-X1" }]));
        assert!(!cache.is_stale("/api/products"));

        cache.invalidate("/api/products");
        assert!(cache.is_stale("/api/products"));
        assert_eq!(cache.get("/api/products").unwrap().value[0]["sku"], "TP-X1");

        cache.put("/api/products", json!([]));
        assert!(!cache.is_stale("/api/products"));
    }

    #[test]
    fn missing_key_counts_as_stale() {
        let cache = QueryCache::new();
        assert!(cache.is_stale("/api/customers"));
        assert!(cache.is_empty());
    }

    #[test]
    fn invalidation_is_published_even_without_entry() {
        let cache = QueryCache::new();
        let mut rx = cache.subscribe();

        cache.invalidate("/api/dashboard/stats");

        assert_eq!(rx.try_recv().unwrap(), "/api/dashboard/stats");
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn refresh_stores_fetched_value() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/dashboard/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "todaySales": 12 })))
            .mount(&server)
            .await;

        let client = QueryClient::with_client(
            reqwest_client(),
            Url::parse(&server.uri()).unwrap(),
        );
        let cache = QueryCache::new();
        cache.put("/api/dashboard/stats", json!({ "todaySales": 11 }));
        cache.invalidate("/api/dashboard/stats");

        cache.refresh(&client, "/api/dashboard/stats").await.unwrap();

        let entry = cache.get("/api/dashboard/stats").unwrap();
        assert!(!entry.stale);
        assert_eq!(entry.value["todaySales"], 12);
    }

    #[tokio::test]
    async fn refresh_drops_vanished_query() {
        let server = MockServer::start().await;
        let client = QueryClient::with_client(
            reqwest_client(),
            Url::parse(&server.uri()).unwrap(),
        );
        let cache = QueryCache::new();
        cache.put("/api/whatsapp/status", json!({ "connected": true }));

        let err = cache.refresh(&client, "/api/whatsapp/status").await.unwrap_err();
        assert!(matches!(err, CoreError::QueryNotFound { .. }));
        assert!(cache.get("/api/whatsapp/status").is_none());
    }

    fn reqwest_client() -> laptoppos_api::rest::HttpClient {
        laptoppos_api::rest::HttpClient::new()
    }
}
