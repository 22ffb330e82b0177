//! Tests for pagination module

use super::*;
use crate::config::{ClientConfig, PaginationKeys};
use crate::error::Error;
use crate::http::{HttpClient, RequestOptions, ResponseBody};
use futures::{StreamExt, TryStreamExt};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use test_case::test_case;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn keys() -> PaginationKeys {
    PaginationKeys::default()
}

fn collection(name: &str) -> PaginationMode {
    PaginationMode::ExtractCollection(name.to_string())
}

fn client_for(server: &MockServer) -> Arc<HttpClient> {
    client_with(ClientConfig::builder().api_key("k").base_url(server.uri()).build())
}

fn client_with(config: ClientConfig) -> Arc<HttpClient> {
    Arc::new(HttpClient::new(config).unwrap())
}

async fn mount_page(server: &MockServer, page: u32, body: Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/leads/view/1"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn leads_page(ids: &[u64], total_pages: u64) -> Value {
    let leads: Vec<Value> = ids.iter().map(|id| json!({"id": id})).collect();
    json!({"leads": leads, "meta": {"total_pages": total_pages}})
}

// ============================================================================
// CursorState Tests
// ============================================================================

#[test]
fn test_cursor_state_default() {
    let state = CursorState::new(0);
    assert!(state.buffered.is_empty());
    assert_eq!(state.next_page, 0);
    assert_eq!(state.upcoming_page(), Some(1));
    assert!(!state.exhausted);
}

#[test]
fn test_cursor_state_append() {
    let mut state = CursorState::new(2);
    assert_eq!(state.upcoming_page(), Some(3));

    state.append(
        3,
        PageBatch {
            elements: vec![json!(1), json!(2)],
            last: false,
            total_pages: Some(5),
        },
    );
    assert_eq!(state.buffered, vec![json!(1), json!(2)]);
    assert_eq!(state.next_page, 3);
    assert!(!state.exhausted);

    state.append(
        4,
        PageBatch {
            elements: vec![json!(3)],
            last: true,
            total_pages: Some(5),
        },
    );
    assert_eq!(state.buffered.len(), 3);
    assert_eq!(state.next_page, 4);
    assert!(state.exhausted);
}

#[test]
fn test_cursor_state_exhaustion_never_reverts() {
    let mut state = CursorState::new(0);
    state.mark_exhausted();
    state.append(
        1,
        PageBatch {
            elements: vec![],
            last: false,
            total_pages: None,
        },
    );
    assert!(state.exhausted);
}

// ============================================================================
// extract_page Tests
// ============================================================================

#[test]
fn test_extract_collection_from_object() {
    let body = ResponseBody::Json(leads_page(&[1, 2], 3));
    let batch = extract_page(body, 1, &collection("leads"), &keys()).unwrap();

    assert_eq!(batch.elements, vec![json!({"id": 1}), json!({"id": 2})]);
    assert_eq!(batch.total_pages, Some(3));
    assert!(!batch.last);
}

#[test]
fn test_extract_last_page() {
    let body = ResponseBody::Json(leads_page(&[5], 3));
    let batch = extract_page(body, 3, &collection("leads"), &keys()).unwrap();
    assert!(batch.last);
}

#[test]
fn test_page_past_total_is_last() {
    let body = ResponseBody::Json(leads_page(&[], 3));
    let batch = extract_page(body, 7, &collection("leads"), &keys()).unwrap();
    assert!(batch.last);
    assert!(batch.elements.is_empty());
}

#[test]
fn test_whole_page_mode_wraps_body() {
    let page = leads_page(&[1, 2], 2);
    let batch = extract_page(ResponseBody::Json(page.clone()), 1, &PaginationMode::WholePage, &keys())
        .unwrap();

    assert_eq!(batch.elements, vec![page]);
    assert!(!batch.last);
}

#[test]
fn test_array_body_is_final() {
    let body = ResponseBody::Json(json!([{"id": 1}, {"id": 2}, {"id": 3}]));
    let batch = extract_page(body, 1, &collection("lookup"), &keys()).unwrap();

    assert_eq!(batch.elements.len(), 3);
    assert!(batch.last);
    assert!(batch.total_pages.is_none());
}

#[test]
fn test_missing_meta_ends_iteration() {
    let body = ResponseBody::Json(json!({"leads": [{"id": 1}]}));
    let batch = extract_page(body, 1, &collection("leads"), &keys()).unwrap();
    assert!(batch.last);
    assert_eq!(batch.elements.len(), 1);
}

#[test]
fn test_total_pages_as_string() {
    let body = ResponseBody::Json(json!({"leads": [], "meta": {"total_pages": "4"}}));
    let batch = extract_page(body, 1, &collection("leads"), &keys()).unwrap();
    assert_eq!(batch.total_pages, Some(4));
}

#[test]
fn test_custom_metadata_keys() {
    let keys = PaginationKeys {
        meta: "paging".to_string(),
        total_pages: "pages".to_string(),
    };
    let body = ResponseBody::Json(json!({"deals": [], "paging": {"pages": 2}}));
    let batch = extract_page(body, 2, &collection("deals"), &keys).unwrap();
    assert_eq!(batch.total_pages, Some(2));
    assert!(batch.last);
}

#[test]
fn test_missing_collection_key() {
    let body = ResponseBody::Json(leads_page(&[1], 1));
    let err = extract_page(body, 1, &collection("contacts"), &keys()).unwrap_err();
    assert!(matches!(err, Error::RecordExtraction { collection, .. } if collection == "contacts"));
}

#[test]
fn test_collection_not_an_array() {
    let body = ResponseBody::Json(json!({"leads": {"id": 1}, "meta": {"total_pages": 1}}));
    let err = extract_page(body, 1, &collection("leads"), &keys()).unwrap_err();
    assert!(err.to_string().contains("expected an array, found object"));
}

#[test]
fn test_raw_body_is_unsupported() {
    let body = ResponseBody::Raw(br#"{"leads": []}"#.to_vec());
    let err = extract_page(body, 1, &collection("leads"), &keys()).unwrap_err();
    assert!(matches!(err, Error::RawPagination));
}

#[test]
fn test_scalar_body_is_unexpected() {
    let err = extract_page(ResponseBody::Json(json!(42)), 1, &collection("leads"), &keys())
        .unwrap_err();
    assert!(matches!(err, Error::UnexpectedShape { kind } if kind == "number"));
}

// ============================================================================
// Cursor Tests
// ============================================================================

#[tokio::test]
async fn test_cursor_flattens_pages_in_order() {
    let server = MockServer::start().await;
    mount_page(&server, 1, leads_page(&[1, 2], 3), 1).await;
    mount_page(&server, 2, leads_page(&[3, 4], 3), 1).await;
    mount_page(&server, 3, leads_page(&[5], 3), 1).await;

    let mut cursor = Cursor::new(
        client_for(&server),
        "/api/leads/view/1",
        collection("leads"),
        RequestOptions::new(),
    )
    .unwrap();

    let ids: Vec<Value> = cursor
        .collect_all()
        .await
        .unwrap()
        .into_iter()
        .map(|lead| lead["id"].clone())
        .collect();

    assert_eq!(ids, vec![json!(1), json!(2), json!(3), json!(4), json!(5)]);
    assert!(cursor.is_exhausted());
    assert_eq!(cursor.next_page(), 3);
}

#[tokio::test]
async fn test_cursor_is_lazy() {
    let server = MockServer::start().await;
    mount_page(&server, 1, leads_page(&[1, 2], 2), 1).await;
    mount_page(&server, 2, leads_page(&[3], 2), 0).await;

    let mut cursor = Cursor::new(
        client_for(&server),
        "/api/leads/view/1",
        collection("leads"),
        RequestOptions::new(),
    )
    .unwrap();

    let first_two: Vec<Value> = cursor.stream().take(2).try_collect().await.unwrap();
    assert_eq!(first_two.len(), 2);
    assert_eq!(cursor.buffered().len(), 2);
    assert!(!cursor.is_exhausted());
}

#[tokio::test]
async fn test_cursor_replay_does_not_refetch() {
    let server = MockServer::start().await;
    mount_page(&server, 1, leads_page(&[1, 2], 2), 1).await;
    mount_page(&server, 2, leads_page(&[3], 2), 1).await;

    let mut cursor = Cursor::new(
        client_for(&server),
        "/api/leads/view/1",
        collection("leads"),
        RequestOptions::new(),
    )
    .unwrap();

    let first = cursor.collect_all().await.unwrap();
    let second = cursor.collect_all().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);

    let tail: Vec<Value> = cursor.stream_from(1).try_collect().await.unwrap();
    assert_eq!(tail, first[1..].to_vec());
}

#[tokio::test]
async fn test_cursor_restart_extends_shared_state() {
    let server = MockServer::start().await;
    mount_page(&server, 1, leads_page(&[1, 2], 2), 1).await;
    mount_page(&server, 2, leads_page(&[3, 4], 2), 1).await;

    let mut cursor = Cursor::new(
        client_for(&server),
        "/api/leads/view/1",
        collection("leads"),
        RequestOptions::new(),
    )
    .unwrap();

    assert_eq!(cursor.element_at(0).await.unwrap(), Some(json!({"id": 1})));
    assert_eq!(cursor.buffered().len(), 2);

    let rest: Vec<Value> = cursor.stream_from(1).try_collect().await.unwrap();
    assert_eq!(rest, vec![json!({"id": 2}), json!({"id": 3}), json!({"id": 4})]);
    assert_eq!(cursor.element_at(4).await.unwrap(), None);
}

#[tokio::test]
async fn test_cursor_array_response_fetched_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("q", "ada"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "type": "lead"},
            {"id": 9, "type": "contact"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut cursor = Cursor::new(
        client_for(&server),
        "/api/search",
        collection("search"),
        RequestOptions::new().param("q", "ada"),
    )
    .unwrap();

    let results = cursor.collect_all().await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(cursor.is_exhausted());
    assert_eq!(cursor.element_at(5).await.unwrap(), None);
}

#[tokio::test]
async fn test_cursor_whole_pages() {
    let server = MockServer::start().await;
    mount_page(&server, 1, leads_page(&[1, 2], 2), 1).await;
    mount_page(&server, 2, leads_page(&[3], 2), 1).await;

    let mut cursor = Cursor::new(
        client_for(&server),
        "/api/leads/view/1",
        PaginationMode::WholePage,
        RequestOptions::new(),
    )
    .unwrap();

    let pages = cursor.collect_all().await.unwrap();
    assert_eq!(pages, vec![leads_page(&[1, 2], 2), leads_page(&[3], 2)]);
}

#[tokio::test]
async fn test_cursor_starts_after_supplied_page() {
    let server = MockServer::start().await;
    mount_page(&server, 3, leads_page(&[5, 6], 3), 1).await;

    let mut cursor = Cursor::new(
        client_for(&server),
        "/api/leads/view/1",
        collection("leads"),
        RequestOptions::new().param("page", "2"),
    )
    .unwrap();
    assert_eq!(cursor.next_page(), 2);

    let leads = cursor.collect_all().await.unwrap();
    assert_eq!(leads, vec![json!({"id": 5}), json!({"id": 6})]);
}

#[test_case("abc" ; "not a number")]
#[test_case("-1" ; "negative")]
#[test_case("4294967296" ; "beyond u32")]
fn test_cursor_rejects_invalid_start_page(page: &str) {
    let client = client_with(
        ClientConfig::builder()
            .api_key("k")
            .domain("example")
            .build(),
    );

    let err = Cursor::new(
        client,
        "/api/leads/view/1",
        collection("leads"),
        RequestOptions::new().param("page", page),
    )
    .unwrap_err();

    assert!(matches!(err, Error::InvalidConfigValue { field, .. } if field == "page"));
}

#[tokio::test]
async fn test_cursor_ends_at_last_page_number() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(leads_page(&[1], 1)))
        .expect(0)
        .mount(&server)
        .await;

    let mut cursor = Cursor::new(
        client_for(&server),
        "/api/leads/view/1",
        collection("leads"),
        RequestOptions::new().param("page", u32::MAX.to_string()),
    )
    .unwrap();

    assert_eq!(cursor.element_at(0).await.unwrap(), None);
    assert!(cursor.is_exhausted());
    assert!(cursor.collect_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cursor_max_elements_cap() {
    let server = MockServer::start().await;
    mount_page(&server, 1, leads_page(&[1, 2], 5), 1).await;
    mount_page(&server, 2, leads_page(&[3, 4], 5), 1).await;
    mount_page(&server, 3, leads_page(&[5, 6], 5), 0).await;

    let config = ClientConfig::builder()
        .api_key("k")
        .base_url(server.uri())
        .max_elements(3)
        .build();
    let mut cursor = Cursor::new(
        client_with(config),
        "/api/leads/view/1",
        collection("leads"),
        RequestOptions::new(),
    )
    .unwrap();

    // the cap stops further fetches; elements already buffered are still served
    let leads = cursor.collect_all().await.unwrap();
    assert_eq!(leads.len(), 4);
    assert!(cursor.is_exhausted());
}

#[tokio::test]
async fn test_cursor_without_cap_override() {
    let server = MockServer::start().await;
    mount_page(&server, 1, leads_page(&[1, 2], 2), 1).await;
    mount_page(&server, 2, leads_page(&[3], 2), 1).await;

    let config = ClientConfig::builder()
        .api_key("k")
        .base_url(server.uri())
        .max_elements(1)
        .build();
    let mut cursor = Cursor::new(
        client_with(config),
        "/api/leads/view/1",
        collection("leads"),
        RequestOptions::new(),
    )
    .unwrap()
    .with_max_elements(None);

    assert_eq!(cursor.collect_all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_cursor_raw_data_fails() {
    let server = MockServer::start().await;
    mount_page(&server, 1, leads_page(&[1], 1), 1).await;

    let config = ClientConfig::builder()
        .api_key("k")
        .base_url(server.uri())
        .raw_data(true)
        .build();
    let mut cursor = Cursor::new(
        client_with(config),
        "/api/leads/view/1",
        collection("leads"),
        RequestOptions::new(),
    )
    .unwrap();

    let err = cursor.collect_all().await.unwrap_err();
    assert!(matches!(err, Error::RawPagination));
    assert!(cursor.buffered().is_empty());
}

#[tokio::test]
async fn test_cursor_empty_page_body_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/leads/view/1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut cursor = Cursor::new(
        client_for(&server),
        "/api/leads/view/1",
        collection("leads"),
        RequestOptions::new(),
    )
    .unwrap();

    let err = cursor.element_at(0).await.unwrap_err();
    assert!(matches!(err, Error::UnexpectedShape { kind } if kind == "empty body"));
}

#[tokio::test]
async fn test_cursor_propagates_http_errors() {
    let server = MockServer::start().await;
    mount_page(&server, 1, leads_page(&[1, 2], 3), 1).await;

    Mock::given(method("GET"))
        .and(path("/api/leads/view/1"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({"message": "Too many requests"})))
        .mount(&server)
        .await;

    let mut cursor = Cursor::new(
        client_for(&server),
        "/api/leads/view/1",
        collection("leads"),
        RequestOptions::new(),
    )
    .unwrap();

    let results: Vec<_> = cursor.stream().collect().await;
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(matches!(&results[2], Err(Error::Api(api)) if api.status == Some(429)));
    assert_eq!(cursor.buffered().len(), 2);
    assert_eq!(cursor.next_page(), 1);
}
