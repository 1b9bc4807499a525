//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::logic::input::InputError;
use crate::logic::model::ModelError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors
    #[error("No input data provided")]
    BadRequest,

    // Model errors
    #[error("ML model not loaded")]
    ModelUnavailable,

    // Generic errors, message is returned to the caller
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest => StatusCode::BAD_REQUEST,
            AppError::ModelUnavailable => {
                tracing::error!("Prediction requested but no model is loaded");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(msg) => {
                tracing::error!("Prediction error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<InputError> for AppError {
    fn from(err: InputError) -> Self {
        match err {
            InputError::Empty => AppError::BadRequest,
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        AppError::Internal(err.to_string())
    }
}
