mod common;

use axum::http::{Method, StatusCode};
use chrono::{DateTime, Utc};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn books_require_bearer_token() {
    let app = TestApp::new();

    let missing = app.request(Method::GET, "/books", None, None, None).await;
    let garbage = app
        .request(Method::GET, "/books", None, Some("not-a-jwt"), None)
        .await;

    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_without_date_defaults_to_now() {
    let app = TestApp::new();
    let token = app.access_token().await;

    let created = app
        .request(
            Method::POST,
            "/books",
            Some(json!({ "title": "Dune", "author": "Herbert", "rating": 5 })),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["id"].as_i64().unwrap();
    assert!(created.body["message"].is_string());

    let fetched = app
        .request(Method::GET, &format!("/books/{}", id), None, Some(&token), None)
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["title"], "Dune");
    assert_eq!(fetched.body["author"], "Herbert");
    assert_eq!(fetched.body["rating"], 5);

    let publish_date: DateTime<Utc> = fetched.body["publish_date"].as_str().unwrap().parse().unwrap();
    assert!((Utc::now() - publish_date).num_seconds().abs() < 5);
}

#[tokio::test]
async fn explicit_date_is_midnight_utc() {
    let app = TestApp::new();
    let token = app.access_token().await;

    let created = app
        .request(
            Method::POST,
            "/books",
            Some(json!({ "title": "Dune", "author": "Herbert", "publish_date": "1965-08-01", "rating": 5 })),
            Some(&token),
            None,
        )
        .await;
    let id = created.body["id"].as_i64().unwrap();

    let fetched = app
        .request(Method::GET, &format!("/books/{}", id), None, Some(&token), None)
        .await;
    let publish_date: DateTime<Utc> = fetched.body["publish_date"].as_str().unwrap().parse().unwrap();
    assert_eq!(publish_date.to_rfc3339(), "1965-08-01T00:00:00+00:00");
}

#[tokio::test]
async fn bad_date_format_is_bad_request() {
    let app = TestApp::new();
    let token = app.access_token().await;

    let response = app
        .request(
            Method::POST,
            "/books",
            Some(json!({ "title": "Dune", "author": "Herbert", "publish_date": "08/01/1965", "rating": 5 })),
            Some(&token),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.book_count(), 0);
}

#[tokio::test]
async fn rating_out_of_range_creates_nothing() {
    let app = TestApp::new();
    let token = app.access_token().await;

    let response = app
        .request(
            Method::POST,
            "/books",
            Some(json!({ "title": "Dune", "author": "Herbert", "rating": 6 })),
            Some(&token),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.book_count(), 0);
}

#[tokio::test]
async fn unknown_book_is_not_found() {
    let app = TestApp::new();
    let token = app.access_token().await;

    let response = app
        .request(Method::GET, "/books/999", None, Some(&token), None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "book not found");
    assert!(response.body["time"].is_string());
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() {
    let app = TestApp::new();
    let token = app.access_token().await;

    let response = app
        .request(Method::GET, "/books/abc", None, Some(&token), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_list_and_delete() {
    let app = TestApp::new();
    let token = app.access_token().await;

    for title in ["Dune", "Emma"] {
        app.request(
            Method::POST,
            "/books",
            Some(json!({ "title": title, "author": "Someone", "rating": 3 })),
            Some(&token),
            None,
        )
        .await;
    }

    let updated = app
        .request(
            Method::PUT,
            "/books/1",
            Some(json!({ "title": "Dune Messiah", "author": "Herbert", "publish_date": "", "rating": 4 })),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["id"], 1);

    let listed = app.request(Method::GET, "/books", None, Some(&token), None).await;
    let books = listed.body.as_array().unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0]["title"], "Dune Messiah");
    assert_eq!(books[0]["rating"], 4);
    assert_eq!(books[1]["title"], "Emma");

    let deleted = app
        .request(Method::DELETE, "/books/1", None, Some(&token), None)
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let again = app
        .request(Method::DELETE, "/books/1", None, Some(&token), None)
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);

    let missing_update = app
        .request(
            Method::PUT,
            "/books/1",
            Some(json!({ "title": "Dune", "author": "Herbert", "rating": 4 })),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(missing_update.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn audit_failures_do_not_fail_requests() {
    use book_service::{repository::InMemoryStore, services::RecordingAudit, AppState};
    use std::sync::Arc;

    let store = Arc::new(InMemoryStore::new());
    let state = AppState::new(
        common::test_config(),
        store.clone(),
        Arc::new(RecordingAudit::failing()),
    )
    .unwrap();
    let token = state.jwt.generate_access_token(1).unwrap();
    let app = TestApp {
        router: book_service::build_router(state.clone()),
        state,
        store,
        audit: Arc::new(RecordingAudit::new()),
    };

    let response = app
        .request(
            Method::POST,
            "/books",
            Some(json!({ "title": "Dune", "author": "Herbert", "rating": 5 })),
            Some(&token),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(app.store.book_count(), 1);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new();

    let response = app
        .request(Method::GET, "/.well-known/openapi.json", None, None, None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["paths"]["/books/{id}"].is_object());
}

#[tokio::test]
async fn overlong_title_is_bad_request() {
    let app = TestApp::new();
    let token = app.access_token().await;

    let response = app
        .request(
            Method::POST,
            "/books",
            Some(json!({ "title": "x".repeat(300), "author": "Herbert", "rating": 5 })),
            Some(&token),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.book_count(), 0);
}
