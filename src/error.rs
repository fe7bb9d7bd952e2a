//! Structured error types for API responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors
    MissingRequiredField,
    InvalidFieldValue,

    // Not found errors
    TaskNotFound,
    SubtaskNotFound,

    // Internal errors
    DatabaseError,
}

/// Structured error returned to clients as a JSON body.
#[derive(Debug, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    // Convenience constructors

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("{} is required", field),
        )
        .with_field(field)
    }

    pub fn invalid_value(field: &str, reason: &str) -> Self {
        Self::new(ErrorCode::InvalidFieldValue, reason).with_field(field)
    }

    pub fn task_not_found(task_id: i64) -> Self {
        Self::new(
            ErrorCode::TaskNotFound,
            format!("Task not found: {}", task_id),
        )
    }

    pub fn subtask_not_found(subtask_id: i64) -> Self {
        Self::new(
            ErrorCode::SubtaskNotFound,
            format!("Subtask not found: {}", subtask_id),
        )
    }

    /// Generic store failure. The underlying error never reaches the
    /// response payload; callers log it before constructing this.
    pub fn database() -> Self {
        Self::new(ErrorCode::DatabaseError, "database operation failed")
    }

    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self.code {
            ErrorCode::MissingRequiredField | ErrorCode::InvalidFieldValue => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::TaskNotFound | ErrorCode::SubtaskNotFound => StatusCode::NOT_FOUND,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Allow using ? with anyhow errors by converting them
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        // Try to downcast to ApiError first
        match err.downcast::<ApiError>() {
            Ok(api_err) => api_err,
            Err(err) => {
                tracing::error!("store operation failed: {err:#}");
                ApiError::database()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Result type for handler operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ApiError::missing_field("title").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::task_not_found(7).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::subtask_not_found(7).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::database().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn serializes_with_screaming_snake_code() {
        let json = serde_json::to_string(&ApiError::missing_field("title")).unwrap();
        assert!(json.contains("MISSING_REQUIRED_FIELD"));
        assert!(json.contains("\"field\":\"title\""));
    }

    #[test]
    fn anyhow_roundtrip_preserves_api_error() {
        let err: anyhow::Error = ApiError::task_not_found(42).into();
        let recovered = ApiError::from(err);
        assert_eq!(recovered.code, ErrorCode::TaskNotFound);
    }

    #[test]
    fn opaque_errors_collapse_to_database_error() {
        let err = anyhow::anyhow!("disk on fire");
        let recovered = ApiError::from(err);
        assert_eq!(recovered.code, ErrorCode::DatabaseError);
        assert!(!recovered.message.contains("disk"));
    }
}
