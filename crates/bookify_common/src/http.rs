// --- File: crates/bookify_common/src/http.rs ---
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::error::{BookifyError, HttpStatusCode};

// Include the client module
pub mod client;

/// Extension trait for BookifyError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for BookifyError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let error_message = if self.is_client_visible() {
            self.to_string()
        } else {
            error!("Request failed: {}", self);
            "Internal server error".to_string()
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "code": status_code.as_u16(),
            }
        }));

        (status_code, body).into_response()
    }
}

/// Implement IntoResponse for BookifyError so handlers can return it directly.
impl IntoResponse for BookifyError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

// Extractor rejections are client errors and share the error body shape.
impl From<JsonRejection> for BookifyError {
    fn from(rejection: JsonRejection) -> Self {
        BookifyError::ValidationError(rejection.body_text())
    }
}

impl From<PathRejection> for BookifyError {
    fn from(rejection: PathRejection) -> Self {
        BookifyError::ValidationError(rejection.body_text())
    }
}
