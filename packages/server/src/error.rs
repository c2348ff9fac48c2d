use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::storage::StorageError;
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Human-readable error description.
    #[schema(example = "Invalid Request!")]
    pub error: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    /// Authenticated, but not allowed to use the route.
    Unauthorized,
    InvalidCredentials,
    NotFound(String),
    Conflict(String),
    /// The media store failed or refused the request.
    Upstream(String),
    Internal(String),
}

/// Message for a path id that is not a well-formed id.
pub const INVALID_REQUEST: &str = "Invalid Request!";
/// Message for a well-formed id with no record behind it.
pub const RECORD_NOT_FOUND: &str = "Invalid Request!, record not found";
pub const CLOUD_REMOVE_FAILED: &str = "Could not remove image from the cloud!";

impl AppError {
    pub fn invalid_id() -> Self {
        AppError::Validation(INVALID_REQUEST.into())
    }

    pub fn record_not_found() -> Self {
        AppError::NotFound(RECORD_NOT_FOUND.into())
    }

    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let (status, error) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::TokenMissing | AppError::TokenInvalid => {
                (StatusCode::UNAUTHORIZED, "Invalid token!".into())
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized access!".into()),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Email/Password mismatch!".into())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Upstream(msg) => {
                tracing::warn!("Media store failure: {}", msg);
                (StatusCode::BAD_GATEWAY, msg)
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".into(),
                )
            }
        };
        (status, ErrorBody { error })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::SizeLimitExceeded { limit, .. } => {
                AppError::Validation(format!("File exceeds maximum size of {limit} bytes"))
            }
            StorageError::InvalidPublicId(_) => AppError::invalid_id(),
            StorageError::NotFound(_) => AppError::NotFound("Media not found".into()),
            StorageError::Backend(detail) => {
                tracing::error!("Object store error: {detail}");
                AppError::Upstream("Media storage request failed!".into())
            }
            StorageError::Io(e) => AppError::Internal(format!("Media storage IO error: {e}")),
        }
    }
}
