//! Mapping of request errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use dirserve_core::ServeError;

/// A [`ServeError`] on its way back to the client.
#[derive(Debug)]
pub struct ApiError(pub ServeError);

impl ApiError {
    /// HTTP status for the wrapped error.
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ServeError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ServeError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServeError::Conflict { .. } => StatusCode::CONFLICT,
            ServeError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServeError> for ApiError {
    fn from(err: ServeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if self.0.is_client_error() {
            self.0.to_string()
        } else {
            error!(error = %self.0, "Request failed");
            "Internal server error".to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError(ServeError::bad_request("x")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(ServeError::not_found("x")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(ServeError::conflict("x")).status(),
            StatusCode::CONFLICT
        );
        let internal = ServeError::io(
            "x",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(
            ApiError(internal).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
