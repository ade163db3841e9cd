//! Error Handling Module
//!
//! Turns domain failures into HTTP responses.
//!
//! Existing clients expect every failure as `413 Payload Too Large` with the
//! message under `mensaje` (or `error`, or an empty list, depending on the
//! endpoint). `ApiError` always renders that legacy shape and attaches a
//! [`Failure`] extension; with `ERROR_STYLE=strict` the
//! [`normalize_error_response`] layer rewrites it into a proper status code
//! and a single body shape.

use axum::{
    extract::rejection::{BytesRejection, JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::services::LibraryError;

/// Body shape of a legacy failure response
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorBody {
    /// `{"mensaje": "..."}`
    Mensaje,
    /// `{"error": "..."}`
    Error,
    /// `[]`
    EmptyList,
}

/// API error type
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ApiError {
    error: LibraryError,
    body: ErrorBody,
}

impl ApiError {
    pub fn with_body(mut self, body: ErrorBody) -> Self {
        self.body = body;
        self
    }
}

/// Status and message a failure maps to in strict mode
#[derive(Debug, Clone)]
pub struct Failure {
    pub status: StatusCode,
    pub message: String,
}

/// Strict error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn strict_status(error: &LibraryError) -> StatusCode {
    match error {
        LibraryError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        LibraryError::NotFound(_) => StatusCode::NOT_FOUND,
        LibraryError::Conflict(_) => StatusCode::CONFLICT,
        LibraryError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.error.to_string();

        match &self.error {
            LibraryError::StoreUnavailable(_) => {
                tracing::error!(kind = self.error.kind(), %message, "Request failed");
            }
            _ => {
                tracing::warn!(kind = self.error.kind(), %message, "Request rejected");
            }
        }

        let body = match self.body {
            ErrorBody::Mensaje => json!({ "mensaje": message }),
            ErrorBody::Error => json!({ "error": message }),
            ErrorBody::EmptyList => json!([]),
        };

        let mut response = (StatusCode::PAYLOAD_TOO_LARGE, Json(body)).into_response();
        response.extensions_mut().insert(Failure {
            status: strict_status(&self.error),
            message,
        });
        response
    }
}

impl From<LibraryError> for ApiError {
    fn from(error: LibraryError) -> Self {
        Self {
            error,
            body: ErrorBody::Mensaje,
        }
    }
}

const MALFORMED_BODY: &str = "El cuerpo de la solicitud no es un JSON válido";

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "JSON body rejected");
        LibraryError::invalid(MALFORMED_BODY).into()
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Request body unreadable");
        LibraryError::invalid(MALFORMED_BODY).into()
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Path rejected");
        LibraryError::invalid("Identificador inválido").into()
    }
}

/// Response mapper installed when `ERROR_STYLE=strict`
///
/// Successful responses pass through untouched.
pub async fn normalize_error_response(response: Response) -> Response {
    match response.extensions().get::<Failure>().cloned() {
        Some(failure) => (
            failure.status,
            Json(ErrorResponse {
                error: failure.message,
            }),
        )
            .into_response(),
        None => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_legacy_shape_uses_413() {
        let err = ApiError::from(LibraryError::not_found("Libro no encontrado"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            body_json(response).await,
            json!({ "mensaje": "Libro no encontrado" })
        );
    }

    #[tokio::test]
    async fn test_alternate_legacy_bodies() {
        let err = ApiError::from(LibraryError::StoreUnavailable("down".to_string()))
            .with_body(ErrorBody::Error);
        assert_eq!(body_json(err.into_response()).await, json!({ "error": "down" }));

        let err = ApiError::from(LibraryError::StoreUnavailable("down".to_string()))
            .with_body(ErrorBody::EmptyList);
        assert_eq!(body_json(err.into_response()).await, json!([]));
    }

    #[tokio::test]
    async fn test_strict_normalization() {
        let cases = [
            (LibraryError::invalid("bad"), StatusCode::BAD_REQUEST),
            (LibraryError::not_found("missing"), StatusCode::NOT_FOUND),
            (LibraryError::conflict("taken"), StatusCode::CONFLICT),
            (
                LibraryError::StoreUnavailable("down".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, status) in cases {
            let message = error.to_string();
            let legacy = ApiError::from(error)
                .with_body(ErrorBody::EmptyList)
                .into_response();
            let strict = normalize_error_response(legacy).await;
            assert_eq!(strict.status(), status);
            assert_eq!(body_json(strict).await, json!({ "error": message }));
        }
    }

    #[tokio::test]
    async fn test_success_passes_through_strict_mapper() {
        let ok = Json(json!({ "mensaje": "Se borró correctamente" })).into_response();
        let mapped = normalize_error_response(ok).await;
        assert_eq!(mapped.status(), StatusCode::OK);
    }
}
