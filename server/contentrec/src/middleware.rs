//! Request correlation and response logging middleware

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id stored in request extensions
#[derive(Debug, Clone)]
pub struct CorrelationId(pub String);

/// Request correlation ID middleware
///
/// Reuses a client-supplied `x-request-id` or generates a UUID, exposes it to
/// handlers through request extensions and echoes it on the response.
pub async fn request_correlation_id(mut request: Request, next: Next) -> Response {
    let correlation_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(CorrelationId(correlation_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}

/// Logs every response, errors at higher levels
pub async fn response_logging(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let correlation_id = request
        .extensions()
        .get::<CorrelationId>()
        .map(|c| c.0.clone())
        .unwrap_or_default();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    if status.is_server_error() {
        error!(%method, %path, status = status.as_u16(), elapsed_ms, %correlation_id, "Server error response");
    } else if status.is_client_error() {
        debug!(%method, %path, status = status.as_u16(), elapsed_ms, %correlation_id, "Client error response");
    } else {
        info!(%method, %path, status = status.as_u16(), elapsed_ms, %correlation_id, "Request completed");
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Extension, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/",
                get(|Extension(id): Extension<CorrelationId>| async move { id.0 }),
            )
            .layer(axum::middleware::from_fn(response_logging))
            .layer(axum::middleware::from_fn(request_correlation_id))
    }

    #[tokio::test]
    async fn test_correlation_id_generation() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let header = response.headers().get("x-request-id").unwrap().clone();
        let id_str = header.to_str().unwrap();
        assert!(Uuid::parse_str(id_str).is_ok());

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, id_str.as_bytes());
    }

    #[tokio::test]
    async fn test_correlation_id_propagated() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("x-request-id", "client-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers().get("x-request-id").unwrap(), "client-123");
    }
}
