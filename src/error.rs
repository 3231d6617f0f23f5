use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::ml::VectorizerError;
use crate::models::UnknownContentType;

/// Message returned while the catalog has not finished loading
pub const NOT_LOADED_MESSAGE: &str = "Model not loaded. Server might be initializing.";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Model not loaded: {0}")]
    NotLoaded(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Data load error: {0}")]
    DataLoad(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Vectorizer error: {0}")]
    Vectorizer(#[from] VectorizerError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<UnknownContentType> for AppError {
    fn from(err: UnknownContentType) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotLoaded(reason) => {
                tracing::warn!(reason = %reason, "Request rejected while model is not loaded");
                (StatusCode::SERVICE_UNAVAILABLE, NOT_LOADED_MESSAGE.to_string())
            }
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DataLoad(_)
            | AppError::Csv(_)
            | AppError::Io(_)
            | AppError::Json(_)
            | AppError::Vectorizer(_)
            | AppError::Internal(_) => {
                tracing::error!(error = %self, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
