//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: OAuth2 token fetch → authenticated
//! paginated requests → aggregate and page-list results.

use async_trait::async_trait;
use avito_connector::api::{AnalyticsQuery, ItemsQuery};
use avito_connector::http::{HttpClient, HttpClientConfig};
use avito_connector::pagination::Sleep;
use avito_connector::{AvitoClient, CancelToken, Error, PaginationPolicy};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct NoopSleep;

#[async_trait]
impl Sleep for NoopSleep {
    async fn sleep(&self, _duration: Duration) {}
}

fn bare_client(mock_server: &MockServer) -> AvitoClient {
    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .no_rate_limit()
        .build();
    AvitoClient::with_http(HttpClient::with_config(config)).with_sleeper(Arc::new(NoopSleep))
}

// ============================================================================
// OAuth2 + API flow
// ============================================================================

#[tokio::test]
async fn test_token_fetch_then_authenticated_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "live-token",
            "expires_in": 86400,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ratings/v1/info"))
        .and(header("Authorization", "Bearer live-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "score": 4.8,
            "reviewsCount": 120
        })))
        .mount(&mock_server)
        .await;

    let mut config = avito_connector::ConnectorConfig::new("client-id", "client-secret");
    config.base_url = mock_server.uri();
    config.token_url = format!("{}/token", mock_server.uri());
    config.http.requests_per_minute = 6000;

    let client = AvitoClient::new(&config).unwrap();
    let info = client.get_rating_info().await.unwrap();

    assert_eq!(info["reviewsCount"], 120);
}

// ============================================================================
// End-to-end pagination
// ============================================================================

#[tokio::test]
async fn test_list_items_end_to_end() {
    let mock_server = MockServer::start().await;

    for page in 1..=3u64 {
        let count = if page == 3 { 1 } else { 2 };
        let resources: Vec<serde_json::Value> = (0..count)
            .map(|i| json!({"id": (page - 1) * 2 + i + 1}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/core/v1/items"))
            .and(query_param("page", page.to_string()))
            .and(query_param("per_page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resources": resources,
                "meta": {"total": 5}
            })))
            .mount(&mock_server)
            .await;
    }

    let client = bare_client(&mock_server);
    let policy = PaginationPolicy::page_number(1, 2).with_delay(Duration::ZERO);

    let aggregate = client
        .list_items(&ItemsQuery::new(), policy)
        .await
        .unwrap();

    assert_eq!(aggregate.items.len(), 5);
    assert_eq!(aggregate.meta.requests_made, 3);
    assert_eq!(aggregate.meta.total_fetched, 5);
    assert_eq!(aggregate.meta.total_available, Some(5));
    assert!(!aggregate.meta.max_reached);
    assert!(!aggregate.meta.cancelled);
}

#[tokio::test]
async fn test_list_items_bounded_truncates() {
    let mock_server = MockServer::start().await;

    // Always-full pages: only the bound stops the run
    Mock::given(method("GET"))
        .and(path("/core/v1/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resources": [{"id": 1}, {"id": 2}]
        })))
        .mount(&mock_server)
        .await;

    let client = bare_client(&mock_server);
    let policy = PaginationPolicy::page_number(1, 2)
        .bounded(4)
        .with_delay(Duration::ZERO);

    let aggregate = client
        .list_items(&ItemsQuery::new(), policy)
        .await
        .unwrap();

    assert_eq!(aggregate.meta.requests_made, 4);
    assert_eq!(aggregate.items.len(), 8);
    assert!(aggregate.meta.max_reached);
}

#[tokio::test]
async fn test_analytics_429_retry_then_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/stats/v2/accounts/42/items"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "61")
                .set_body_string("Too many requests"),
        )
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/stats/v2/accounts/42/items"))
        .and(body_partial_json(json!({"offset": 0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"groupings": [{"itemId": 1}], "dataTotalCount": 1}
        })))
        .mount(&mock_server)
        .await;

    let client = bare_client(&mock_server);
    let query = AnalyticsQuery::new(
        42,
        "2024-01-01",
        "2024-01-31",
        "item",
        vec!["views".to_string()],
    );

    let pages = client
        .analytics(&query, avito_connector::api::analytics::default_policy())
        .await
        .unwrap();

    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].items.len(), 1);
}

#[tokio::test]
async fn test_analytics_429_exhausts_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/stats/v2/accounts/42/items"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too many requests"))
        .mount(&mock_server)
        .await;

    let client = bare_client(&mock_server);
    let query = AnalyticsQuery::new(
        42,
        "2024-01-01",
        "2024-01-31",
        "item",
        vec!["views".to_string()],
    );

    let err = client
        .analytics(&query, avito_connector::api::analytics::default_policy())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::RetriesExhausted {
            attempts: 4,
            pages_fetched: 0
        }
    ));
}

#[tokio::test]
async fn test_server_error_aborts_with_progress() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ratings/v1/reviews"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reviews": [{"id": 1}, {"id": 2}],
            "total": 10
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ratings/v1/reviews"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Bad request"))
        .mount(&mock_server)
        .await;

    let client = bare_client(&mock_server);
    let policy = PaginationPolicy::offset(0, 2).with_delay(Duration::ZERO);

    let err = client.list_reviews(policy).await.unwrap_err();

    match err {
        Error::Aborted {
            pages_fetched,
            items_fetched,
            last_cursor,
            ..
        } => {
            assert_eq!(pages_fetched, 1);
            assert_eq!(items_fetched, 2);
            assert_eq!(last_cursor, 0);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_cancellation_returns_partial_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/core/v1/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resources": [{"id": 1}, {"id": 2}]
        })))
        .mount(&mock_server)
        .await;

    let cancel = CancelToken::new();
    let client = bare_client(&mock_server).with_cancel_token(cancel.clone());

    let policy = PaginationPolicy::page_number(1, 2).with_delay(Duration::from_millis(1));
    cancel.cancel();

    let aggregate = client
        .list_items(&ItemsQuery::new(), policy)
        .await
        .unwrap();

    assert!(aggregate.meta.cancelled);
    assert_eq!(aggregate.meta.requests_made, 0);
}
