//! Passthrough route tests against a mock data store.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use gymclock_server::{router, SupabaseClient};

/// Execute one request against the router and return status and body.
async fn send(
    app: Router,
    method: Method,
    uri: &str,
    json_body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match json_body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).expect("Failed to build request");
    let response = app.oneshot(request).await.expect("Failed to execute request");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body")
        .to_vec();
    (status, bytes)
}

#[tokio::test]
async fn root_serves_health_text() {
    let app = router(SupabaseClient::new("http://127.0.0.1:9", "unused"));
    let (status, body) = send(app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("running"));
}

#[tokio::test]
async fn get_todos_returns_rows() {
    let mut store = mockito::Server::new_async().await;
    store
        .mock("GET", "/rest/v1/todos")
        .match_query(mockito::Matcher::UrlEncoded("select".into(), "*".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id":1,"title":"stretch"},{"id":2,"title":"hydrate"}]"#)
        .create_async()
        .await;

    let app = router(SupabaseClient::new(store.url(), "key"));
    let (status, body) = send(app, Method::GET, "/todos", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows: Vec<Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["title"], "stretch");
}

#[tokio::test]
async fn post_todos_returns_the_inserted_row() {
    let mut store = mockito::Server::new_async().await;
    let insert = store
        .mock("POST", "/rest/v1/todos")
        .match_header("prefer", "return=representation")
        .match_body(mockito::Matcher::Json(serde_json::json!([
            {"title": "bench press"}
        ])))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id":3,"title":"bench press"}]"#)
        .create_async()
        .await;

    let app = router(SupabaseClient::new(store.url(), "key"));
    let (status, body) = send(
        app,
        Method::POST,
        "/todos",
        Some(serde_json::json!({"title": "bench press"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows: Vec<Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(rows[0]["id"], 3);
    insert.assert_async().await;
}

#[tokio::test]
async fn data_store_failure_maps_to_500_with_error_body() {
    let mut store = mockito::Server::new_async().await;
    store
        .mock("POST", "/rest/v1/todos")
        .with_status(500)
        .with_body(r#"{"message":"relation does not exist"}"#)
        .create_async()
        .await;

    let app = router(SupabaseClient::new(store.url(), "key"));
    let (status, body) = send(
        app,
        Method::POST,
        "/todos",
        Some(serde_json::json!({"title": "squats"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"], "relation does not exist");
}

#[tokio::test]
async fn unreachable_store_also_maps_to_500() {
    // Nothing listens on this port.
    let app = router(SupabaseClient::new("http://127.0.0.1:9", "key"));
    let (status, body) = send(app, Method::GET, "/todos", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert!(error["error"].is_string());
}
