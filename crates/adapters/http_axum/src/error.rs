//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use casebook_domain::error::{AuthError, CasebookError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`CasebookError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(CasebookError);

impl ApiError {
    /// A path or query parameter that cannot be parsed.
    #[must_use]
    pub fn malformed(field: &'static str) -> Self {
        Self(ValidationError::Format { field }.into())
    }
}

impl From<CasebookError> for ApiError {
    fn from(err: CasebookError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            CasebookError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            CasebookError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            CasebookError::Conflict(err) => (StatusCode::CONFLICT, err.to_string()),
            CasebookError::Auth(err @ AuthError::InvalidCredentials) => {
                (StatusCode::UNAUTHORIZED, err.to_string())
            }
            CasebookError::Auth(err @ AuthError::NotOwner { .. }) => {
                (StatusCode::FORBIDDEN, err.to_string())
            }
            CasebookError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
