//! Mapping of [`QaError`] onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use tracing::error;

use ccube_core::{ErrorKind, QaError};

/// Message sent for every 500; the detail goes to the log only.
pub const INTERNAL_MESSAGE: &str = "internal server error";

/// A request failure rendered as `{"error": ...}` with a matching status.
#[derive(Debug)]
pub struct ApiError(pub QaError);

impl From<QaError> for ApiError {
    fn from(err: QaError) -> Self {
        Self(err)
    }
}

/// HTTP status for an error kind.
#[must_use]
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let message = match kind {
            ErrorKind::Internal => {
                error!(error = %self.0, "request failed");
                INTERNAL_MESSAGE.to_string()
            }
            _ => self.0.to_string(),
        };
        (
            status_for(kind),
            Json(serde_json::json!({ "error": message })),
        )
            .into_response()
    }
}
