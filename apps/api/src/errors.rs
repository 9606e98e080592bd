use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use resume_model::api_error::{codes, ErrorBody};
use resume_model::{FieldError, ValidationErrors};
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        fields: Vec<FieldError>,
    },

    #[error("Unauthorized")]
    Unauthorized,

    /// The resource exists but belongs to another owner.
    #[error("Forbidden")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>, errors: ValidationErrors) -> Self {
        AppError::Validation {
            message: message.into(),
            fields: errors.0,
        }
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::Llm(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody::new(codes::NOT_FOUND, msg)),
            AppError::Validation { message, fields } => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new(codes::VALIDATION_ERROR, message).with_fields(fields),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new(codes::UNAUTHORIZED, "Authentication required"),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                ErrorBody::new(codes::FORBIDDEN, "Access denied"),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new(codes::DATABASE_ERROR, "A database error occurred"),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new(codes::LLM_ERROR, "An AI processing error occurred"),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new(codes::INTERNAL_ERROR, "An internal server error occurred"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
