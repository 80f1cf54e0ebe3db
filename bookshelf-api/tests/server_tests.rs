/// Health endpoint, response headers and seed data

mod common;

use axum::http::StatusCode;
use bookshelf_shared::db::seed::seed_if_empty;
use common::TestContext;

#[tokio::test]
async fn test_health_reports_in_memory_store() {
    let ctx = TestContext::new();

    let response = ctx.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["database"], "in_memory");
    assert_eq!(response.body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_every_response_carries_security_headers_and_request_id() {
    let ctx = TestContext::new();

    for uri in ["/health", "/books", "/no-such-route"] {
        let response = ctx.get(uri).await;

        assert_eq!(response.headers["x-content-type-options"], "nosniff");
        assert_eq!(response.headers["x-frame-options"], "DENY");
        assert!(response.headers.contains_key("x-request-id"));
        assert!(!response.headers.contains_key("strict-transport-security"));
    }
}

#[tokio::test]
async fn test_production_mode_adds_hsts() {
    let ctx = TestContext::with_vars(&[("PRODUCTION", "true")]);

    let response = ctx.get("/health").await;

    assert!(response.headers.contains_key("strict-transport-security"));
}

#[tokio::test]
async fn test_seeded_catalogue_is_served() {
    let ctx = TestContext::new();
    assert!(seed_if_empty(&ctx.uow).await.unwrap());

    let books = ctx.get("/books").await.body;
    let books = books.as_array().unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0]["title"], "1984");
    assert_eq!(books[0]["reviews"][0]["userName"], "john_smith");
    assert_eq!(books[1]["title"], "The Great Gatsby");
    assert_eq!(books[1]["reviews"][0]["rating"], 5);

    assert_eq!(ctx.get("/reviews").await.body.as_array().unwrap().len(), 2);
}
