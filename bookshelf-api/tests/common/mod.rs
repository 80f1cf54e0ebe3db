//! Common test utilities for integration tests
//!
//! Every test gets its own router over a fresh in-memory unit of work, so
//! tests never share data and need no database.
//! - Configuration built from an explicit variable map
//! - A low-cost Argon2 hasher to keep registration fast
//! - Request helpers returning status, headers and the JSON body

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use bookshelf_api::{
    app::{build_router, AppState},
    config::Config,
};
use bookshelf_shared::{auth::password::Argon2Hasher, repositories::UnitOfWork};
use serde_json::{json, Value};
use std::{collections::HashMap, sync::Arc};
use tower::Service as _;
use uuid::Uuid;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";
pub const PASSWORD: &str = "Secret123!";

/// Test context containing the router and its backing store
pub struct TestContext {
    pub app: Router,
    pub uow: UnitOfWork,
    pub config: Config,
}

/// A decoded response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_vars(&[])
    }

    /// Creates a context with extra environment-style overrides
    pub fn with_vars(overrides: &[(&str, &str)]) -> Self {
        let mut vars: HashMap<String, String> = HashMap::from([
            (
                "DATABASE_URL".to_string(),
                "postgres://localhost/bookshelf_test".to_string(),
            ),
            ("JWT_SECRET".to_string(), JWT_SECRET.to_string()),
        ]);
        for (key, value) in overrides {
            vars.insert(key.to_string(), value.to_string());
        }

        let config = Config::from_vars(vars).expect("test configuration should load");
        let uow = UnitOfWork::in_memory();
        let hasher = Argon2Hasher::with_params(1024, 1, 1).expect("valid argon2 params");

        let state = AppState::with_password_hasher(config.clone(), uow.clone(), None, Arc::new(hasher));

        Self {
            app: build_router(state),
            uow,
            config,
        }
    }

    /// Sends a request, optionally with a JSON body and a bearer token
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().call(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, None).await
    }

    /// Registers a credential and returns its id
    pub async fn register(&self, email: &str, password: &str) -> Uuid {
        let response = self
            .send(
                Method::POST,
                "/auth/register",
                Some(json!({
                    "firstName": "Jane",
                    "lastName": "Doe",
                    "email": email,
                    "password": password,
                })),
                None,
            )
            .await;

        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        id_of(&response)
    }

    /// Logs in and returns the bearer token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .send(
                Method::POST,
                "/auth/login",
                Some(json!({ "email": email, "password": password })),
                None,
            )
            .await;

        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.body["token"].as_str().unwrap().to_string()
    }

    /// Registers a fresh credential and returns a token for it
    pub async fn token(&self) -> String {
        let email = format!("reader-{}@example.com", Uuid::new_v4());
        self.register(&email, PASSWORD).await;
        self.login(&email, PASSWORD).await
    }

    pub async fn create_book(&self, token: &str, title: &str, author: &str) -> Uuid {
        let response = self
            .send(
                Method::POST,
                "/books",
                Some(json!({ "title": title, "author": author })),
                Some(token),
            )
            .await;

        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        id_of(&response)
    }

    pub async fn create_user(&self, token: &str, user_name: &str) -> Uuid {
        let response = self
            .send(
                Method::POST,
                "/users",
                Some(json!({ "userName": user_name })),
                Some(token),
            )
            .await;

        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        id_of(&response)
    }

    pub async fn create_review(
        &self,
        token: &str,
        book_id: Uuid,
        user_id: Uuid,
        rating: i32,
    ) -> Uuid {
        let response = self
            .send(
                Method::POST,
                "/reviews",
                Some(json!({
                    "content": "Worth reading",
                    "rating": rating,
                    "bookId": book_id,
                    "userId": user_id,
                })),
                Some(token),
            )
            .await;

        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        id_of(&response)
    }
}

/// Reads the `id` of a `201 Created` body
pub fn id_of(response: &TestResponse) -> Uuid {
    response.body["id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .expect("response should carry an id")
}
