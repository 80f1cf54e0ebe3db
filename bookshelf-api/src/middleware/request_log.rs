/// Request logging middleware
///
/// Logs every request when it starts and when it finishes, tagged with a
/// request id. The id is taken from an incoming `x-request-id` header or
/// generated, and echoed back on the response. Requests slower than
/// [`SLOW_REQUEST_THRESHOLD`] are logged at `warn`.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::{Duration, Instant};
use uuid::Uuid;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

pub const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_secs(3);

fn request_id(req: &Request) -> HeaderValue {
    req.headers()
        .get(&REQUEST_ID_HEADER)
        .filter(|value| !value.is_empty() && value.len() <= 128)
        .cloned()
        .or_else(|| HeaderValue::from_str(&Uuid::new_v4().to_string()).ok())
        .unwrap_or_else(|| HeaderValue::from_static("unknown"))
}

/// Middleware function; install with `axum::middleware::from_fn`
pub async fn request_log_layer(req: Request, next: Next) -> Response {
    let id = request_id(&req);
    let request_id = id.to_str().unwrap_or("invalid").to_owned();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    tracing::info!(%request_id, %method, %path, "Request started");
    let started = Instant::now();

    let mut response = next.run(req).await;

    let elapsed = started.elapsed();
    let status = response.status().as_u16();
    let elapsed_ms = elapsed.as_millis() as u64;

    if elapsed > SLOW_REQUEST_THRESHOLD {
        tracing::warn!(%request_id, %method, %path, status, elapsed_ms, "Slow request");
    } else {
        tracing::info!(%request_id, %method, %path, status, elapsed_ms, "Request finished");
    }

    response.headers_mut().insert(REQUEST_ID_HEADER.clone(), id);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware::from_fn, routing::get, Router};
    use tower::Service as _;

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(from_fn(request_log_layer))
    }

    #[test]
    fn test_request_id_header_name() {
        assert_eq!(REQUEST_ID_HEADER.as_str(), "x-request-id");
    }

    #[tokio::test]
    async fn test_generates_request_id() {
        let response = app()
            .call(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let id = response.headers()[&REQUEST_ID_HEADER].to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn test_echoes_incoming_request_id() {
        let response = app()
            .call(
                Request::builder()
                    .uri("/")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()[&REQUEST_ID_HEADER], "abc-123");
    }
}
