/// Book endpoints over the in-memory store

mod common;

use axum::http::{header, Method, StatusCode};
use common::{id_of, TestContext};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_create_then_get_book() {
    let ctx = TestContext::new();
    let token = ctx.token().await;

    let response = ctx
        .send(
            Method::POST,
            "/books",
            Some(json!({ "title": "Dune", "author": "Frank Herbert" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let id = id_of(&response);
    assert_eq!(response.headers[header::LOCATION], format!("/books/{id}"));

    let response = ctx.get(&format!("/books/{id}")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"], id.to_string());
    assert_eq!(response.body["title"], "Dune");
    assert_eq!(response.body["author"], "Frank Herbert");
    assert_eq!(response.body["reviews"], json!([]));
}

#[tokio::test]
async fn test_list_books_includes_reviews() {
    let ctx = TestContext::new();
    let token = ctx.token().await;

    let dune = ctx.create_book(&token, "Dune", "Frank Herbert").await;
    ctx.create_book(&token, "Anathem", "Neal Stephenson").await;
    let user = ctx.create_user(&token, "reader").await;
    ctx.create_review(&token, dune, user, 5).await;

    let response = ctx.get("/books").await;
    assert_eq!(response.status, StatusCode::OK);

    let books = response.body.as_array().unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0]["title"], "Anathem");
    assert_eq!(books[0]["reviews"], json!([]));
    assert_eq!(books[1]["title"], "Dune");
    assert_eq!(books[1]["reviews"][0]["rating"], 5);
    assert_eq!(books[1]["reviews"][0]["userName"], "reader");
    assert_eq!(books[1]["reviews"][0]["bookTitle"], "Dune");
}

#[tokio::test]
async fn test_get_missing_book_is_not_found() {
    let ctx = TestContext::new();

    let response = ctx.get(&format!("/books/{}", Uuid::new_v4())).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "not_found");
}

#[tokio::test]
async fn test_get_book_with_malformed_id_is_bad_request() {
    let ctx = TestContext::new();

    let response = ctx.get("/books/not-a-uuid").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "bad_request");
}

#[tokio::test]
async fn test_create_book_validation() {
    let ctx = TestContext::new();
    let token = ctx.token().await;

    let response = ctx
        .send(
            Method::POST,
            "/books",
            Some(json!({ "title": "   ", "author": "a".repeat(101) })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "validation_error");
    let details = response.body["details"].as_array().unwrap();
    assert_eq!(details.len(), 2);
    assert_eq!(details[0]["field"], "author");
    assert_eq!(details[1]["field"], "title");
}

#[tokio::test]
async fn test_update_book() {
    let ctx = TestContext::new();
    let token = ctx.token().await;
    let id = ctx.create_book(&token, "Dune", "Herbert").await;

    let response = ctx
        .send(
            Method::PUT,
            "/books",
            Some(json!({ "id": id, "title": "Dune", "author": "Frank Herbert" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_eq!(
        ctx.get(&format!("/books/{id}")).await.body["author"],
        "Frank Herbert"
    );
}

#[tokio::test]
async fn test_update_missing_book_is_not_found() {
    let ctx = TestContext::new();
    let token = ctx.token().await;

    let response = ctx
        .send(
            Method::PUT,
            "/books",
            Some(json!({ "id": Uuid::new_v4(), "title": "Dune", "author": "Frank Herbert" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_without_id_is_validation_error() {
    let ctx = TestContext::new();
    let token = ctx.token().await;

    let response = ctx
        .send(
            Method::PUT,
            "/books",
            Some(json!({ "title": "Dune", "author": "Frank Herbert" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"][0]["field"], "id");
}

#[tokio::test]
async fn test_delete_book_removes_its_reviews() {
    let ctx = TestContext::new();
    let token = ctx.token().await;
    let book = ctx.create_book(&token, "Dune", "Frank Herbert").await;
    let user = ctx.create_user(&token, "reader").await;
    let review = ctx.create_review(&token, book, user, 4).await;

    let response = ctx
        .send(Method::DELETE, &format!("/books/{book}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    assert_eq!(
        ctx.get(&format!("/books/{book}")).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        ctx.get(&format!("/reviews/{review}")).await.status,
        StatusCode::NOT_FOUND
    );

    let again = ctx
        .send(Method::DELETE, &format!("/books/{book}"), None, Some(&token))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reads_are_public() {
    let ctx = TestContext::new();

    assert_eq!(ctx.get("/books").await.status, StatusCode::OK);
    assert_eq!(ctx.get("/books").await.body, json!([]));
}
