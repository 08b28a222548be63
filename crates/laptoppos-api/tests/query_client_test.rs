#![allow(clippy::unwrap_used)]
// Integration tests for `QueryClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use laptoppos_api::{Error, QueryClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, QueryClient) {
    let server = MockServer::start().await;
    let origin = Url::parse(&server.uri()).unwrap();
    let client = QueryClient::with_client(reqwest::Client::new(), origin);
    (server, client)
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_returns_json_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/products/low-stock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "sku": "TP-X1", "stock": 1 },
            { "sku": "DL-5420", "stock": 2 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let value = client.fetch("/api/products/low-stock").await.unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
    assert_eq!(value[0]["sku"], "TP-X1");
}

#[tokio::test]
async fn test_fetch_maps_error_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/roles"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let result = client.fetch("/api/roles").await;
    match result {
        Err(Error::Http { status, body }) => {
            assert_eq!(status, 403);
            assert_eq!(body, "Forbidden");
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_missing_query_is_not_found() {
    let (_server, client) = setup().await;

    let err = client.fetch("/api/does-not-exist").await.unwrap_err();
    assert!(err.is_not_found(), "expected not-found, got: {err:?}");
}

#[tokio::test]
async fn test_fetch_rejects_non_json_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.fetch("/api/dashboard/stats").await.unwrap_err();
    assert!(
        matches!(err, Error::Deserialization { .. }),
        "expected Deserialization, got: {err:?}"
    );
}
