//! Handler errors and their HTTP rendering

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use byte_domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Error returned by route handlers.
///
/// Rendered as `{"status_code": <u16>, "detail": <message>}`.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl HandlerError {
    /// HTTP status this error renders with.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for HandlerError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidInput(msg) => Self::BadRequest(msg),
            DomainError::NotFound(msg) => Self::NotFound(msg),
            DomainError::Conflict(msg) => Self::Conflict(msg),
            DomainError::Config(msg) | DomainError::Internal(msg) => Self::Internal(msg),
        }
    }
}

/// Malformed or mistyped request bodies share the handler error shape.
impl From<JsonRejection> for HandlerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    status_code: u16,
    detail: &'a str,
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        }
        let detail = self.to_string();
        let body = ErrorBody { status_code: status.as_u16(), detail: &detail };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_mapping() {
        let cases = [
            (DomainError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (DomainError::Conflict("x".into()), StatusCode::CONFLICT),
            (DomainError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(HandlerError::from(err).status(), status);
        }
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = HandlerError::NotFound("Guild 7 not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({"status_code": 404, "detail": "Guild 7 not found"}));
    }
}
