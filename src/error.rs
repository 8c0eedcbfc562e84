use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::backend::BackendError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();
        fields.sort_unstable();
        AppError::Validation(format!("Invalid fields: {}", fields.join(", ")))
    }
}

/// Statuses the backend reports that are passed through unchanged.
fn passthrough_status(status: u16) -> Option<StatusCode> {
    match status {
        401 => Some(StatusCode::UNAUTHORIZED),
        403 => Some(StatusCode::FORBIDDEN),
        404 => Some(StatusCode::NOT_FOUND),
        412 => Some(StatusCode::PRECONDITION_FAILED),
        _ => None,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Authentication(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Backend(BackendError::Status { status, message }) => {
                match passthrough_status(*status) {
                    Some(code) => (code, message.clone()),
                    None => {
                        tracing::error!("Backend returned {}: {}", status, message);
                        (StatusCode::BAD_GATEWAY, "Backend request failed".to_string())
                    }
                }
            }
            AppError::Backend(e) => {
                tracing::error!("Backend error: {}", e);
                (StatusCode::BAD_GATEWAY, "Backend request failed".to_string())
            }
        };

        let body = Json(json!({ "detail": message }));
        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
