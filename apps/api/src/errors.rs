use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::intake::IntakeError;
use crate::llm_client::LlmError;

/// Shown when a submission is missing its name, reference or sources.
pub const INCOMPLETE_FORM_MESSAGE: &str = "Please fill in all required fields and upload files.";

/// Shown for any failure while decoding an upload batch.
pub const INTAKE_FAILED_MESSAGE: &str =
    "Error processing some files. Please ensure they are valid PDF or DOCX documents.";

/// Shown for any failure of the generation call, whatever its cause.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Error generating LaTeX project. Please verify your files and try again.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Busy: {0}")]
    Busy(String),

    #[error("Intake error: {0}")]
    Intake(#[from] IntakeError),

    #[error("Generation error: {0}")]
    Generation(#[from] LlmError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Busy(msg) => (StatusCode::CONFLICT, "BUSY", msg.clone()),
            AppError::Intake(e) => {
                tracing::warn!("Intake error: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "INTAKE_ERROR",
                    INTAKE_FAILED_MESSAGE.to_string(),
                )
            }
            AppError::Generation(e) => {
                tracing::error!("Generation error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "GENERATION_ERROR",
                    GENERATION_FAILED_MESSAGE.to_string(),
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

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
