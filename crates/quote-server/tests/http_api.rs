//! REST API behavior over an in-memory store

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use quote_document::{DocumentStore, MemoryStore};
use quote_server::{router, AppState, USER_HEADER};
use quote_session::QuoteConfig;
use quote_test_utils::{sample_snapshot, RecordingStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn make_app() -> Router {
    router(AppState::new(
        Arc::new(MemoryStore::new()),
        QuoteConfig::default(),
    ))
}

fn request(method: Method, uri: &str, user: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(USER_HEADER, user);
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn company_info(company_id: &str) -> Value {
    json!({
        "companyInfo": {
            "companyName": "Acme Ltd",
            "companyId": company_id,
            "companyPhone": "0501234567",
            "customerName": "Globex"
        },
        "logo": null
    })
}

async fn create(app: &Router, user: &str) -> String {
    let (status, body) = send(
        app,
        request(Method::POST, "/quotes", Some(user), Some(company_info("123456789"))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_healthz() {
    let (status, body) = send(&make_app(), request(Method::GET, "/healthz", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_missing_identity_is_401() {
    let (status, _) = send(
        &make_app(),
        request(Method::POST, "/quotes", None, Some(company_info("123456789"))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_validation_failure() {
    let (status, body) = send(
        &make_app(),
        request(Method::POST, "/quotes", Some("u1"), Some(company_info("12345"))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["fields"]["companyId"], "companyIdFormat");
}

#[tokio::test]
async fn test_create_and_get() {
    let app = make_app();
    let id = create(&app, "u1").await;

    let (status, body) = send(&app, request(Method::GET, &format!("/quotes/{id}"), Some("u1"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ownerId"], "u1");
    assert_eq!(body["tableSnapshot"]["rows"], json!([]));
}

#[tokio::test]
async fn test_get_missing_and_foreign() {
    let app = make_app();
    let id = create(&app, "owner").await;

    let (status, _) = send(&app, request(Method::GET, "/quotes/nope", Some("owner"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, request(Method::GET, &format!("/quotes/{id}"), Some("intruder"), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.get("companyInfo").is_none());
}

#[tokio::test]
async fn test_patch_commits_and_preview_reflects_it() {
    let app = make_app();
    let id = create(&app, "u1").await;

    let patch = json!({
        "tableSnapshot": serde_json::to_value(sample_snapshot()).unwrap(),
        "terms": "Net 30\nPrices in USD"
    });
    let (status, _) = send(&app, request(Method::PATCH, &format!("/quotes/{id}"), Some("u1"), Some(patch.clone()))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Same patch again is a no-op and still succeeds
    let (status, _) = send(&app, request(Method::PATCH, &format!("/quotes/{id}"), Some("u1"), Some(patch))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, preview) = send(&app, request(Method::GET, &format!("/quotes/{id}/preview"), Some("u1"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["totals"]["subtotal"], "250.00");
    assert_eq!(preview["totals"]["vat"], "42.50");
    assert_eq!(preview["totals"]["total"], "292.50");
    assert_eq!(preview["terms"], json!(["Net 30", "Prices in USD"]));
}

#[tokio::test]
async fn test_patch_writes_once_per_change() {
    let store = Arc::new(RecordingStore::new());
    let app = router(AppState::new(store.clone(), QuoteConfig::default()));
    let id = create(&app, "u1").await;

    for _ in 0..3 {
        let (status, _) = send(
            &app,
            request(Method::PATCH, &format!("/quotes/{id}"), Some("u1"), Some(json!({ "remarks": "Fragile" }))),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
    assert_eq!(store.calls().update, 1);

    let stored = store.get(&quote_document::DocumentId::new(id)).await.unwrap();
    assert_eq!(stored.remarks, "Fragile");
}

#[tokio::test]
async fn test_failed_patch_is_503_and_retry_succeeds() {
    let store = Arc::new(RecordingStore::new());
    let state = AppState::new(store.clone(), QuoteConfig::default());
    let app = router(state.clone());
    let id = create(&app, "u1").await;

    store.fail_next_updates(1);
    let (status, body) = send(
        &app,
        request(Method::PATCH, &format!("/quotes/{id}"), Some("u1"), Some(json!({ "logo": "data:image/png;base64,AA==" }))),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "QUOTE_PERSISTENCE");
    assert_eq!(state.session_count(), 1);

    // Reads show the stored quote, not the unsaved logo
    let (status, body) = send(&app, request(Method::GET, &format!("/quotes/{id}"), Some("u1"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["logo"], Value::Null);

    // Buffered change goes out with the next request
    let (status, _) = send(&app, request(Method::PATCH, &format!("/quotes/{id}"), Some("u1"), Some(json!({})))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(state.session_count(), 0);
    let stored = store.get(&quote_document::DocumentId::new(id.clone())).await.unwrap();
    assert_eq!(stored.logo.as_deref(), Some("data:image/png;base64,AA=="));

    let (_, body) = send(&app, request(Method::GET, &format!("/quotes/{id}"), Some("u1"), None)).await;
    assert_eq!(body["logo"], "data:image/png;base64,AA==");
}

#[tokio::test]
async fn test_saved_sessions_are_not_kept() {
    let state = AppState::new(Arc::new(MemoryStore::new()), QuoteConfig::default());
    let app = router(state.clone());

    for n in 0..5 {
        let id = create(&app, "u1").await;
        let (status, _) = send(&app, request(Method::GET, &format!("/quotes/{id}"), Some("u1"), None)).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(
            &app,
            request(Method::PATCH, &format!("/quotes/{id}"), Some("u1"), Some(json!({ "remarks": format!("r{n}") }))),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, request(Method::GET, &format!("/quotes/{id}/preview"), Some("u1"), None)).await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(state.session_count(), 0);
}

#[tokio::test]
async fn test_list_quotes() {
    let app = make_app();
    let first = create(&app, "u1").await;
    let second = create(&app, "u1").await;
    create(&app, "u2").await;

    let (status, body) = send(&app, request(Method::GET, "/quotes?owner=u1", Some("u1"), None)).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, [second.as_str(), first.as_str()]);

    let (status, _) = send(&app, request(Method::GET, "/quotes?owner=u2", Some("u1"), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, request(Method::GET, "/quotes", Some("u2"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}
