//! Error handling for the rain risk service
//!
//! `PipelineError` covers dataset loading and model training, which are fatal
//! at startup. `AppError` is what HTTP handlers return; a trained model is
//! always present, so request failures are limited to bad input and lookups.

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{InputError, NUMERIC_INPUT_REQUIRED};
use thiserror::Error;

/// Failures while loading observations or training the model
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Dataset {path} could not be opened: {source}")]
    DatasetUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dataset could not be read: {0}")]
    DatasetRead(#[from] csv::Error),

    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Malformed record at line {line}, column '{column}': {reason}")]
    MalformedRecord {
        line: u64,
        column: String,
        reason: String,
    },

    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Training set contains a single class ({0}); at least two are required")]
    SingleClass(String),

    #[error("Column '{0}' has no observed values to compute a median from")]
    NoObservedValues(String),

    #[error("Invalid model settings: {0}")]
    InvalidSettings(String),

    #[error("Training task aborted: {0}")]
    TrainingAborted(String),
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

impl From<InputError> for AppError {
    fn from(err: InputError) -> Self {
        AppError::Validation {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: format!("{} ({})", NUMERIC_INPUT_REQUIRED, message),
                    field: Some(field.clone()),
                },
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: format!("{} ({})", NUMERIC_INPUT_REQUIRED, msg),
                    field: None,
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{} not found", resource),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
