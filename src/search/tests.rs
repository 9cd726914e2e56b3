//! Tests for the search module

use super::*;
use crate::config::PlatformConfig;
use crate::error::Error;
use crate::types::{FilterOperator, Projection, SortDirection};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn items(prefix: &str, count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| json!({"id": format!("{prefix}-{i}")}))
        .collect()
}

fn page_body(key: &str, items: Vec<Value>, total_pages: u32, number: u32) -> Value {
    json!({
        "_embedded": { key: items },
        "page": {
            "size": 100,
            "totalElements": 0,
            "totalPages": total_pages,
            "number": number
        }
    })
}

async fn mount_page(server: &MockServer, search_path: &str, page: u32, body: Value) {
    Mock::given(method("POST"))
        .and(path(search_path))
        .and(body_partial_json(json!({"page": page})))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn client_for(server: &MockServer) -> SearchClient {
    let config = PlatformConfig::new(&server.uri(), "test-key").unwrap();
    SearchClient::from_config(&config).unwrap()
}

async fn pages_requested(server: &MockServer) -> Vec<u64> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| {
            let body: Value = serde_json::from_slice(&r.body).unwrap();
            body["page"].as_u64().unwrap()
        })
        .collect()
}

// ============================================================================
// Filter Tests
// ============================================================================

#[test_case("criticality:EXACT:5", "criticality", FilterOperator::Exact, "5", false ; "exact")]
#[test_case("name:like:test", "name", FilterOperator::Like, "test", false ; "lowercase operator")]
#[test_case("!generic_state:EXACT:open", "generic_state", FilterOperator::Exact, "open", true ; "exclusive")]
#[test_case("hostName:EXACT:db:5432", "hostName", FilterOperator::Exact, "db:5432", false ; "value with colon")]
#[test_case("created:LIKE:", "created", FilterOperator::Like, "", false ; "empty value")]
fn test_filter_from_str(
    input: &str,
    field: &str,
    operator: FilterOperator,
    value: &str,
    exclusive: bool,
) {
    let filter: Filter = input.parse().unwrap();
    assert_eq!(filter.field, field);
    assert_eq!(filter.operator, operator);
    assert_eq!(filter.value, value);
    assert_eq!(filter.exclusive, exclusive);
}

#[test_case("criticality" ; "no separators")]
#[test_case("criticality:EXACT" ; "no value")]
#[test_case(":EXACT:5" ; "empty field")]
#[test_case("criticality:BETWEEN:5" ; "unknown operator")]
fn test_filter_from_str_rejects(input: &str) {
    let err = input.parse::<Filter>().unwrap_err();
    assert!(matches!(err, Error::InvalidFilter { .. }));
}

#[test]
fn test_filter_wire_shape() {
    let filter = Filter::exact("role", "Manager").exclusive();
    assert_eq!(
        serde_json::to_value(&filter).unwrap(),
        json!({
            "field": "role",
            "exclusive": true,
            "operator": "EXACT",
            "value": "Manager"
        })
    );
}

// ============================================================================
// Request Tests
// ============================================================================

#[test]
fn test_search_request_defaults() {
    let request = SearchRequest::new();
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "filters": [],
            "projection": "basic",
            "sort": [{"field": "id", "direction": "ASC"}],
            "page": 0,
            "size": 100
        })
    );
}

#[test]
fn test_search_request_builder_keeps_filter_order() {
    let request = SearchRequest::new()
        .filter(Filter::exact("criticality", "5"))
        .filters(vec![Filter::like("hostName", "web"), Filter::exact("os", "linux")])
        .sort(Sort::desc("criticality"))
        .projection(Projection::Detail)
        .page_size(150);

    let fields: Vec<&str> = request.filters.iter().map(|f| f.field.as_str()).collect();
    assert_eq!(fields, vec!["criticality", "hostName", "os"]);
    assert_eq!(request.sort, vec![Sort::desc("criticality")]);
    assert_eq!(request.sort[0].direction, SortDirection::Desc);
    assert_eq!(request.projection, Projection::Detail);
    assert_eq!(request.size, 150);
}

#[test]
fn test_endpoint_url_path() {
    let endpoint = SearchEndpoint::new(12, "/host/search", "hosts");
    assert_eq!(endpoint.url_path(), "client/12/host/search");
}

// ============================================================================
// Response Decoding Tests
// ============================================================================

#[test]
fn test_search_page_from_body() {
    let body = page_body("hosts", items("h", 3), 2, 0);
    let page = SearchPage::from_body(&body, "hosts").unwrap();

    assert_eq!(page.items.len(), 3);
    assert_eq!(page.items[0]["id"], "h-0");
    assert_eq!(page.info.total_pages, 2);
    assert_eq!(page.info.number, Some(0));
    assert_eq!(page.info.size, Some(100));
}

#[test]
fn test_search_page_without_embedded_and_zero_pages_is_empty() {
    let body = json!({"page": {"size": 100, "totalElements": 0, "totalPages": 0, "number": 0}});
    let page = SearchPage::from_body(&body, "hosts").unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.info.total_pages, 0);
}

#[test]
fn test_search_page_missing_total_pages() {
    let body = json!({"_embedded": {"hosts": []}, "page": {"size": 100}});
    let err = SearchPage::from_body(&body, "hosts").unwrap_err();
    assert!(matches!(err, Error::Schema { .. }));

    let body = json!({"_embedded": {"hosts": []}});
    let err = SearchPage::from_body(&body, "hosts").unwrap_err();
    assert!(matches!(err, Error::Schema { .. }));
}

#[test]
fn test_search_page_wrong_container_key() {
    let body = page_body("hosts", items("h", 1), 1, 0);
    let err = SearchPage::from_body(&body, "users").unwrap_err();
    assert!(err.to_string().contains("_embedded.users"));
}

#[test]
fn test_search_page_missing_embedded_with_pages() {
    let body = json!({"page": {"totalPages": 2}});
    let err = SearchPage::from_body(&body, "hosts").unwrap_err();
    assert!(matches!(err, Error::Schema { .. }));
}

#[test]
fn test_search_page_container_not_array() {
    let body = json!({"_embedded": {"hosts": {"id": 1}}, "page": {"totalPages": 1}});
    let err = SearchPage::from_body(&body, "hosts").unwrap_err();
    assert!(err.to_string().contains("is not an array"));
}

// ============================================================================
// PageCursor Tests
// ============================================================================

fn decoded(count: usize, total_pages: u32) -> SearchPage {
    SearchPage {
        items: items("x", count),
        info: PageInfo {
            total_pages,
            ..Default::default()
        },
    }
}

#[test]
fn test_cursor_starts_on_page_zero() {
    let cursor = PageCursor::new();
    assert_eq!(cursor.next_page(), Some(0));
    assert_eq!(cursor.total_pages(), None);
    assert!(!cursor.is_done());
}

#[test]
fn test_cursor_walks_pages_in_order() {
    let mut cursor = PageCursor::new();

    let (items, next) = cursor.record(decoded(100, 3));
    assert_eq!(items.len(), 100);
    assert_eq!(next, NextPage::Continue(1));
    assert_eq!(cursor.next_page(), Some(1));

    let (_, next) = cursor.record(decoded(100, 3));
    assert_eq!(next, NextPage::Continue(2));

    let (items, next) = cursor.record(decoded(42, 3));
    assert_eq!(items.len(), 42);
    assert_eq!(next, NextPage::Done);
    assert!(cursor.is_done());
    assert_eq!(cursor.items_fetched(), 242);
    assert_eq!(cursor.pages_fetched(), 3);
}

#[test]
fn test_cursor_bound_is_fixed_at_first_read() {
    let mut cursor = PageCursor::new();

    cursor.record(decoded(10, 2));
    // A later page claiming more pages doesn't extend the walk
    let (_, next) = cursor.record(decoded(10, 5));
    assert_eq!(next, NextPage::Done);
    assert_eq!(cursor.total_pages(), Some(2));

    let mut cursor = PageCursor::new();
    cursor.record(decoded(10, 3));
    // Nor does a later page claiming fewer pages cut it short
    let (_, next) = cursor.record(decoded(10, 1));
    assert_eq!(next, NextPage::Continue(2));
}

#[test]
fn test_cursor_zero_pages() {
    let mut cursor = PageCursor::new();
    let (items, next) = cursor.record(decoded(0, 0));

    assert!(items.is_empty());
    assert_eq!(next, NextPage::Done);
    assert_eq!(cursor.next_page(), None);
    assert_eq!(cursor.pages_fetched(), 1);
}

// ============================================================================
// search_all Tests
// ============================================================================

#[tokio::test]
async fn test_search_all_aggregates_pages_in_order() {
    let server = MockServer::start().await;
    let search_path = "/api/v1/client/1/host/search";

    mount_page(&server, search_path, 0, page_body("hosts", items("p0", 100), 3, 0)).await;
    mount_page(&server, search_path, 1, page_body("hosts", items("p1", 100), 3, 1)).await;
    mount_page(&server, search_path, 2, page_body("hosts", items("p2", 42), 3, 2)).await;

    let client = client_for(&server);
    let endpoint = SearchEndpoint::new(1, "host/search", "hosts");
    let result = client
        .search_all(&endpoint, SearchRequest::new().page_size(100))
        .await
        .unwrap();

    assert_eq!(result.len(), 242);
    assert_eq!(result[0]["id"], "p0-0");
    assert_eq!(result[99]["id"], "p0-99");
    assert_eq!(result[100]["id"], "p1-0");
    assert_eq!(result[200]["id"], "p2-0");
    assert_eq!(result[241]["id"], "p2-41");

    assert_eq!(pages_requested(&server).await, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_search_all_single_page_makes_one_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/client/1/user/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body("users", items("u", 7), 1, 0)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let endpoint = SearchEndpoint::new(1, "user/search", "users");
    let result = client.search_all(&endpoint, SearchRequest::new()).await.unwrap();

    assert_eq!(result.len(), 7);
}

#[tokio::test]
async fn test_search_all_zero_pages_returns_empty_after_one_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/client/1/tag/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": {"size": 100, "totalElements": 0, "totalPages": 0, "number": 0}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let endpoint = SearchEndpoint::new(1, "tag/search", "tags");
    let result = client.search_all(&endpoint, SearchRequest::new()).await.unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn test_search_all_fails_with_page_of_failing_call() {
    let server = MockServer::start().await;
    let search_path = "/api/v1/client/1/hostFinding/search";

    mount_page(&server, search_path, 0, page_body("hostFindings", items("f", 100), 3, 0)).await;
    Mock::given(method("POST"))
        .and(path(search_path))
        .and(body_partial_json(json!({"page": 1})))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(search_path))
        .and(body_partial_json(json!({"page": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body("hostFindings", vec![], 3, 2)))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let endpoint = SearchEndpoint::new(1, "hostFinding/search", "hostFindings");
    let err = client
        .search_all(&endpoint, SearchRequest::new())
        .await
        .unwrap_err();

    match err {
        Error::Api { status, body, page } => {
            assert_eq!(status, 500);
            assert_eq!(body, "internal error");
            assert_eq!(page, Some(1));
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_search_all_timeout_mid_pagination_is_transport_error() {
    let server = MockServer::start().await;
    let search_path = "/api/v1/client/1/host/search";

    mount_page(&server, search_path, 0, page_body("hosts", items("h", 100), 3, 0)).await;
    Mock::given(method("POST"))
        .and(path(search_path))
        .and(body_partial_json(json!({"page": 1})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body("hosts", items("late", 100), 3, 1))
                .set_delay(Duration::from_secs(2)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(search_path))
        .and(body_partial_json(json!({"page": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body("hosts", vec![], 3, 2)))
        .expect(0)
        .mount(&server)
        .await;

    let config = PlatformConfig::new(&server.uri(), "test-key")
        .unwrap()
        .with_timeout(Duration::from_millis(200));
    let client = SearchClient::from_config(&config).unwrap();
    let endpoint = SearchEndpoint::new(1, "host/search", "hosts");
    let err = client
        .search_all(&endpoint, SearchRequest::new())
        .await
        .unwrap_err();

    assert!(
        matches!(err, Error::Transport { page: Some(1), .. }),
        "Expected Transport error on page 1, got {err:?}"
    );
}

#[tokio::test]
async fn test_search_all_schema_error_carries_page() {
    let server = MockServer::start().await;
    let search_path = "/api/v1/client/1/host/search";

    mount_page(&server, search_path, 0, page_body("hosts", items("h", 10), 2, 0)).await;
    mount_page(
        &server,
        search_path,
        1,
        json!({"page": {"totalPages": 2, "number": 1}}),
    )
    .await;

    let client = client_for(&server);
    let endpoint = SearchEndpoint::new(1, "host/search", "hosts");
    let err = client
        .search_all(&endpoint, SearchRequest::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Schema { page: Some(1), .. }));
}

#[tokio::test]
async fn test_search_all_discovery_failure_is_page_zero() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/client/1/group/search"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let endpoint = SearchEndpoint::new(1, "group/search", "groups");
    let err = client
        .search_all(&endpoint, SearchRequest::new())
        .await
        .unwrap_err();

    assert_eq!(err.page(), Some(0));
    assert!(err.is_client_error());
}

#[tokio::test]
async fn test_search_all_missing_container_is_schema_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/client/1/network/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body("hosts", items("h", 1), 1, 0)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let endpoint = SearchEndpoint::new(1, "network/search", "networks");
    let err = client
        .search_all(&endpoint, SearchRequest::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Schema { .. }));
}

#[tokio::test]
async fn test_search_all_ignores_later_total_pages() {
    let server = MockServer::start().await;
    let search_path = "/api/v1/client/1/host/search";

    mount_page(&server, search_path, 0, page_body("hosts", items("a", 2), 2, 0)).await;
    // Data set grew: page 1 now claims four pages
    mount_page(&server, search_path, 1, page_body("hosts", items("b", 2), 4, 1)).await;

    let client = client_for(&server);
    let endpoint = SearchEndpoint::new(1, "host/search", "hosts");
    let result = client.search_all(&endpoint, SearchRequest::new()).await.unwrap();

    assert_eq!(result.len(), 4);
    assert_eq!(pages_requested(&server).await, vec![0, 1]);
}

#[tokio::test]
async fn test_search_all_sends_request_body_and_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/client/5/host/search"))
        .and(header("x-api-key", "test-key"))
        .and(body_partial_json(json!({
            "filters": [
                {"field": "criticality", "exclusive": false, "operator": "EXACT", "value": "5"}
            ],
            "projection": "detail",
            "sort": [{"field": "id", "direction": "ASC"}],
            "page": 0,
            "size": 150
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body("hosts", items("h", 1), 1, 0)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let endpoint = SearchEndpoint::new(5, "host/search", "hosts");
    let request = SearchRequest::new()
        .filter(Filter::exact("criticality", "5"))
        .projection(Projection::Detail)
        .page_size(150);

    let result = client.search_all(&endpoint, request).await.unwrap();
    assert_eq!(result.len(), 1);
}

#[tokio::test]
async fn test_search_all_ignores_caller_page_index() {
    let server = MockServer::start().await;
    let search_path = "/api/v1/client/1/host/search";

    mount_page(&server, search_path, 0, page_body("hosts", items("h", 1), 1, 0)).await;

    let client = client_for(&server);
    let endpoint = SearchEndpoint::new(1, "host/search", "hosts");
    let mut request = SearchRequest::new();
    request.page = 7;

    let result = client.search_all(&endpoint, request).await.unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(pages_requested(&server).await, vec![0]);
}

#[tokio::test]
async fn test_search_all_is_repeatable() {
    let server = MockServer::start().await;
    let search_path = "/api/v1/client/1/host/search";

    mount_page(&server, search_path, 0, page_body("hosts", items("p0", 3), 2, 0)).await;
    mount_page(&server, search_path, 1, page_body("hosts", items("p1", 2), 2, 1)).await;

    let client = client_for(&server);
    let endpoint = SearchEndpoint::new(1, "host/search", "hosts");

    let first = client.search_all(&endpoint, SearchRequest::new()).await.unwrap();
    let second = client.search_all(&endpoint, SearchRequest::new()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(pages_requested(&server).await, vec![0, 1, 0, 1]);
}

#[tokio::test]
async fn test_search_page_returns_metadata() {
    let server = MockServer::start().await;
    let search_path = "/api/v1/client/1/host/search";

    mount_page(&server, search_path, 1, page_body("hosts", items("p1", 4), 3, 1)).await;

    let client = client_for(&server);
    let endpoint = SearchEndpoint::new(1, "host/search", "hosts");
    let mut request = SearchRequest::new();
    request.page = 1;

    let page = client.search_page(&endpoint, &request).await.unwrap();
    assert_eq!(page.items.len(), 4);
    assert_eq!(page.info.total_pages, 3);
    assert_eq!(page.info.number, Some(1));
}
