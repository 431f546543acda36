//! Maps `AppError` and `AuthError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use citygate_auth::AuthError;
use citygate_core::error::{AppError, ErrorKind};

const INTERNAL_MESSAGE: &str = "Internal Server Error";

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

/// Error returned by handlers and middleware.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal
            | ErrorKind::Database
            | ErrorKind::Cache
            | ErrorKind::Configuration
            | ErrorKind::Serialization
            | ErrorKind::Timeout => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(AppError::from(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if self.0.kind.is_server_fault() {
            tracing::error!(
                kind = ?self.0.kind,
                error = %self.0,
                source = ?self.0.source,
                "Request failed"
            );
            INTERNAL_MESSAGE.to_string()
        } else {
            self.0.message
        };

        (status, Json(ApiErrorResponse { error: message })).into_response()
    }
}
