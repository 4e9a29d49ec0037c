use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::matching::scoring::MatchError;
use crate::storage::StoreError;

/// A single rejected input field and why.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid fields: {}", summarize(.0))]
    InvalidFields(Vec<FieldError>),

    #[error("Immutable field cannot be changed: {0}")]
    ImmutableField(String),

    #[error("No preferred job title set")]
    NoPreferenceSet,

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Persistence error: {0}")]
    Persistence(StoreError),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

fn summarize(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{} ({})", f.field, f.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => AppError::NotFound(what),
            StoreError::Conflict(what) => AppError::Conflict(what),
            other => AppError::Persistence(other),
        }
    }
}

impl From<MatchError> for AppError {
    fn from(err: MatchError) -> Self {
        AppError::EmptyInput(err.to_string())
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::Llm(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details = None;
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidFields(fields) => {
                details = Some(fields.clone());
                (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "One or more fields are invalid".to_string(),
                )
            }
            AppError::ImmutableField(field) => (
                StatusCode::BAD_REQUEST,
                "IMMUTABLE_FIELD",
                format!("Updating {field} is not allowed"),
            ),
            AppError::NoPreferenceSet => (
                StatusCode::CONFLICT,
                "NO_PREFERENCE_SET",
                "Set a preferred job title before retrieving jobs".to_string(),
            ),
            AppError::EmptyInput(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EMPTY_INPUT",
                msg.clone(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            AppError::Persistence(e) => {
                tracing::error!("Persistence error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PERSISTENCE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = match details {
            Some(fields) => json!({
                "error": {
                    "code": code,
                    "message": message,
                    "details": fields
                }
            }),
            None => json!({
                "error": {
                    "code": code,
                    "message": message
                }
            }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_not_found_maps_to_not_found() {
        let err: AppError = StoreError::NotFound("profile".to_string()).into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_store_conflict_maps_to_conflict() {
        let err: AppError = StoreError::Conflict("seeker".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::ImmutableField("date_of_birth".into())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NoPreferenceSet.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::EmptyInput("job".into()).into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("job".into()).into_response().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_invalid_fields_display_lists_fields() {
        let err = AppError::InvalidFields(vec![FieldError {
            field: "skills".into(),
            reason: "must not be empty".into(),
        }]);
        assert_eq!(err.to_string(), "Invalid fields: skills (must not be empty)");
    }
}
