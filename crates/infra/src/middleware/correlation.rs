//! Request correlation
//!
//! Adopts the caller's `x-correlation-id` or generates one, exposes it to
//! handlers as `Extension<CorrelationId>`, runs the rest of the chain inside
//! a span carrying it, and stamps it on the response.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use axum::extract::Request;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use byte_common::{CorrelationId, CORRELATION_HEADER};
use futures::FutureExt;
use serde_json::json;
use tracing::{error, info, Instrument};

/// Adopt or generate the request's correlation id and echo it on the response.
pub async fn correlation_middleware(mut request: Request, next: Next) -> Response {
    let correlation_id = CorrelationId::from_header_or_generate(
        request.headers().get(CORRELATION_HEADER).and_then(|value| value.to_str().ok()),
    );
    request.extensions_mut().insert(correlation_id.clone());

    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let span = tracing::info_span!(
        "request",
        correlation_id = %correlation_id,
        method = %method,
        path = %path,
    );

    let mut response = async move {
        let started = Instant::now();
        info!("request started");

        let response = match AssertUnwindSafe(next.run(request)).catch_unwind().await {
            Ok(response) => response,
            Err(panic) => {
                error!(panic = %panic_message(panic.as_ref()), "handler panicked");
                internal_error()
            }
        };

        info!(
            status = response.status().as_u16(),
            latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "request completed"
        );
        response
    }
    .instrument(span)
    .await;

    if let Ok(value) = HeaderValue::from_str(correlation_id.as_str()) {
        response.headers_mut().insert(CORRELATION_HEADER, value);
    }
    response
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"status_code": 500, "detail": "Internal Server Error"})),
    )
        .into_response()
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use axum::body::Body;
    use axum::routing::get;
    use axum::{Extension, Router};
    use byte_common::testing::LogCapture;
    use tower::ServiceExt;

    use super::*;

    async fn echo(Extension(id): Extension<CorrelationId>) -> String {
        tracing::info!("handling echo");
        id.into_inner()
    }

    async fn boom() -> &'static str {
        panic!("boom")
    }

    async fn missing() -> StatusCode {
        StatusCode::NOT_FOUND
    }

    fn app() -> Router {
        Router::new()
            .route("/echo", get(echo))
            .route("/boom", get(boom))
            .route("/missing", get(missing))
            .layer(axum::middleware::from_fn(correlation_middleware))
    }

    async fn call(router: Router, uri: &str, header: Option<&str>) -> Response {
        let mut builder = axum::http::Request::builder().uri(uri);
        if let Some(value) = header {
            builder = builder.header(CORRELATION_HEADER, value);
        }
        router.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
    }

    fn header_of(response: &Response) -> String {
        response.headers()[CORRELATION_HEADER].to_str().unwrap().to_string()
    }

    async fn body_of(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_generates_id_when_header_missing() {
        let response = call(app(), "/echo", None).await;
        let header = header_of(&response);
        assert!(!header.is_empty());
        assert_eq!(body_of(response).await, header);
    }

    #[tokio::test]
    async fn test_echoes_supplied_id() {
        let response = call(app(), "/echo", Some("abc-123")).await;
        assert_eq!(header_of(&response), "abc-123");
        assert_eq!(body_of(response).await, "abc-123");
    }

    #[tokio::test]
    async fn test_blank_header_is_replaced() {
        let response = call(app(), "/echo", Some("   ")).await;
        assert!(!header_of(&response).trim().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_requests_get_distinct_ids() {
        let router = app();
        let (a, b) = tokio::join!(call(router.clone(), "/echo", None), call(router, "/echo", None));
        let ids: HashSet<_> = [header_of(&a), header_of(&b)].into_iter().collect();
        assert_eq!(ids.len(), 2);
    }

    #[tokio::test]
    async fn test_error_responses_carry_header() {
        let response = call(app(), "/missing", Some("err-1")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(header_of(&response), "err-1");

        let unrouted = call(app(), "/nowhere", Some("err-2")).await;
        assert_eq!(unrouted.status(), StatusCode::NOT_FOUND);
        assert_eq!(header_of(&unrouted), "err-2");
    }

    /// Validates handler panics become a 500 with the correlation header.
    ///
    /// Assertions:
    /// - Confirms status 500 and a JSON error body.
    /// - Confirms the supplied id is echoed.
    #[tokio::test]
    async fn test_panic_becomes_internal_error() {
        let response = call(app(), "/boom", Some("panic-1")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(header_of(&response), "panic-1");
        assert!(body_of(response).await.contains("Internal Server Error"));
    }

    /// Validates every log line inside the request carries the id.
    ///
    /// Assertions:
    /// - Confirms started, handler, and completed events share the id.
    /// - Confirms the completed event records the status.
    #[tokio::test]
    async fn test_log_lines_carry_correlation_id() {
        let capture = LogCapture::new();
        let _guard = capture.set_default();

        call(app(), "/echo", Some("log-me")).await;

        for message in ["request started", "handling echo", "request completed"] {
            let events = capture.events_with_message(message);
            assert_eq!(events.len(), 1, "{message}");
            assert_eq!(events[0].field("correlation_id"), Some("log-me"), "{message}");
        }
        let completed = &capture.events_with_message("request completed")[0];
        assert_eq!(completed.field("status"), Some("200"));
        assert_eq!(completed.field("path"), Some("/echo"));
    }

    #[test]
    fn test_panic_message_extraction() {
        let static_str: Box<dyn Any + Send> = Box::new("static");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let other: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(static_str.as_ref()), "static");
        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }
}
