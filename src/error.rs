use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
///
/// Every variant aborts the request it was raised in; no partial
/// recommendation is ever returned next to one of these.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// A required profile field is missing or has the wrong type.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A categorical value the encoder was never fitted on.
    #[error("Unknown category '{value}' for column {column}")]
    UnknownCategory { column: String, value: String },

    /// Feature construction, encoding or scoring produced unusable output.
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Short, stable name of the error kind for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::UnknownCategory { .. } => "unknown_category",
            AppError::Pipeline(_) => "pipeline",
            AppError::Internal(_) => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownCategory { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Pipeline(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
