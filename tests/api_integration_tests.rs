//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint against an in-memory
//! object store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use object_store::{memory::InMemory, path::Path, ObjectStore};
use s3_express_cache::cache::{JsonSerializer, ManualClock, Ttl};
use s3_express_cache::{api::create_router, AppState, CacheOptions, ObjectStoreCache};
use serde_json::Value;
use tower::ServiceExt;

const NOW: f64 = 1_700_000_000.0;

// == Helper Functions ==

struct TestApp {
    router: Router,
    store: Arc<InMemory>,
    clock: Arc<ManualClock>,
}

fn create_test_app_with(options: CacheOptions) -> TestApp {
    let store = Arc::new(InMemory::new());
    let clock = Arc::new(ManualClock::new(NOW));
    let cache: ObjectStoreCache<JsonSerializer<Value>> =
        ObjectStoreCache::new(store.clone(), options, JsonSerializer::new())
            .with_clock(clock.clone());
    TestApp {
        router: create_router(AppState::new(cache)),
        store,
        clock,
    }
}

fn create_test_app() -> TestApp {
    create_test_app_with(CacheOptions::default())
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == SET Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_success() {
    let app = create_test_app();

    let (status, json) = send(
        &app.router,
        json_request(
            "PUT",
            "/set",
            r#"{"key":"7-days:page","value":{"html":"<p>hi</p>"},"timeout":3600}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains("7-days:page"));
}

#[tokio::test]
async fn test_set_writes_rewritten_path() {
    let app = create_test_app_with(CacheOptions {
        key_prefix: Some("site".to_string()),
        ..CacheOptions::default()
    });

    let (status, _) = send(
        &app.router,
        json_request(
            "PUT",
            "/set",
            r#"{"key":"7-days:page","value":1,"timeout":60,"version":3}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let stored = app
        .store
        .head(&Path::from("site/7-days/page_3"))
        .await
        .unwrap();
    // 8-byte header + "1"
    assert_eq!(stored.size, 9);
}

#[tokio::test]
async fn test_set_plain_key_with_default_timeout_rejected() {
    let app = create_test_app();

    let (status, json) = send(
        &app.router,
        json_request("PUT", "/set", r#"{"key":"plain","value":"v"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("time-bucket"));
}

#[tokio::test]
async fn test_set_timeout_exceeding_bucket_rejected() {
    let app = create_test_app();
    let eight_days = 8 * 86_400;

    let (status, json) = send(
        &app.router,
        json_request(
            "PUT",
            "/set",
            &format!(r#"{{"key":"7-days:k","value":"v","timeout":{}}}"#, eight_days),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("exceeds"));
}

#[tokio::test]
async fn test_set_unknown_timeout_keyword() {
    let app = create_test_app();

    let (status, _) = send(
        &app.router,
        json_request(
            "PUT",
            "/set",
            r#"{"key":"k","value":"v","timeout":"forever"}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_get_endpoint_success() {
    let app = create_test_app();

    let (status, _) = send(
        &app.router,
        json_request(
            "PUT",
            "/set",
            r#"{"key":"get_key","value":"get_value","timeout":"none"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(&app.router, empty_request("GET", "/get/get_key")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "get_key");
    assert_eq!(json["value"], "get_value");
}

#[tokio::test]
async fn test_get_key_with_slash() {
    let app = create_test_app();

    send(
        &app.router,
        json_request(
            "PUT",
            "/set",
            r#"{"key":"1-day/nested/key","value":[1,2],"timeout":60}"#,
        ),
    )
    .await;

    let (status, json) = send(&app.router, empty_request("GET", "/get/1-day/nested/key")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], serde_json::json!([1, 2]));
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app();

    let (status, _) = send(&app.router, empty_request("GET", "/get/nonexistent_key")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_after_expiration() {
    let app = create_test_app();

    send(
        &app.router,
        json_request("PUT", "/set", r#"{"key":"1-day:ttl","value":"v","timeout":30}"#),
    )
    .await;

    let (status, _) = send(&app.router, empty_request("GET", "/get/1-day:ttl")).await;
    assert_eq!(status, StatusCode::OK);

    app.clock.advance(31.0);

    let (status, _) = send(&app.router, empty_request("GET", "/get/1-day:ttl")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, json) = send(&app.router, empty_request("GET", "/has/1-day:ttl")).await;
    assert_eq!(json["exists"], false);
}

#[tokio::test]
async fn test_get_with_version_query() {
    let app = create_test_app();

    send(
        &app.router,
        json_request(
            "PUT",
            "/set",
            r#"{"key":"x","value":"one","timeout":"none","version":1}"#,
        ),
    )
    .await;

    let (status, _) = send(&app.router, empty_request("GET", "/get/x?version=1")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app.router, empty_request("GET", "/get/x?version=2")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == HAS Endpoint Tests ==

#[tokio::test]
async fn test_has_persistent_entry_after_long_time() {
    let app = create_test_app_with(CacheOptions {
        default_timeout: Ttl::Persistent,
        ..CacheOptions::default()
    });

    send(
        &app.router,
        json_request("PUT", "/set", r#"{"key":"forever","value":true}"#),
    )
    .await;
    app.clock.advance(100.0 * 86_400.0);

    let (status, json) = send(&app.router, empty_request("GET", "/has/forever")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["exists"], true);
}

#[tokio::test]
async fn test_has_empty_object_is_false() {
    let app = create_test_app();
    app.store
        .put(&Path::from("empty"), Vec::<u8>::new().into())
        .await
        .unwrap();

    let (status, json) = send(&app.router, empty_request("GET", "/has/empty")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["exists"], false);

    let (status, json) = send(
        &app.router,
        json_request("POST", "/add", r#"{"key":"empty","value":"v","timeout":"none"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["added"], true);
}

// == ADD Endpoint Tests ==

#[tokio::test]
async fn test_add_endpoint() {
    let app = create_test_app();

    let (status, json) = send(
        &app.router,
        json_request("POST", "/add", r#"{"key":"k","value":"v1","timeout":"none"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["added"], true);

    let (_, json) = send(
        &app.router,
        json_request("POST", "/add", r#"{"key":"k","value":"v2","timeout":"none"}"#),
    )
    .await;
    assert_eq!(json["added"], false);

    let (_, json) = send(&app.router, empty_request("GET", "/get/k")).await;
    assert_eq!(json["value"], "v1");
}

// == DELETE Endpoint Tests ==

#[tokio::test]
async fn test_delete_endpoint_success() {
    let app = create_test_app();

    send(
        &app.router,
        json_request(
            "PUT",
            "/set",
            r#"{"key":"delete_key","value":"delete_value","timeout":"none"}"#,
        ),
    )
    .await;

    let (status, _) = send(&app.router, empty_request("DELETE", "/del/delete_key")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app.router, empty_request("GET", "/get/delete_key")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_endpoint_absent_key() {
    let app = create_test_app();

    let (status, json) = send(&app.router, empty_request("DELETE", "/del/nonexistent_key")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "nonexistent_key");
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app.router, empty_request("GET", "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
