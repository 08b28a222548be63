//! REST query client.
//!
//! Cache keys on the client side are plain API paths (`/api/products`), so
//! refetching an invalidated key is a `GET` of that path on the page origin.

use std::time::Duration;

use url::Url;

use crate::error::Error;

/// HTTP client type accepted by [`QueryClient::with_client`].
pub use reqwest::Client as HttpClient;

/// Fetches JSON query results from the LaptopPOS server.
#[derive(Debug, Clone)]
pub struct QueryClient {
    http: HttpClient,
    origin: Url,
}

impl QueryClient {
    /// Build a client with its own connection pool and cookie store.
    pub fn new(origin: Url, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()?;
        Ok(Self { http, origin })
    }

    /// Wrap an existing `reqwest::Client` (shared pool, tests).
    pub fn with_client(http: HttpClient, origin: Url) -> Self {
        Self { http, origin }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// `GET <origin><cache_key>` and decode the JSON body.
    pub async fn fetch(&self, cache_key: &str) -> Result<serde_json::Value, Error> {
        let url = self.origin.join(cache_key)?;
        tracing::debug!(url = %url, "fetching query");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}
