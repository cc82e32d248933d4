use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use showtime_booking::{BookingError, ErrorKind};
use showtime_core::CoreError;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    /// The resource existed but has aged out
    GoneError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::GoneError(msg) => (StatusCode::GONE, msg),
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err.kind() {
            ErrorKind::NotFound => AppError::NotFoundError(err.to_string()),
            ErrorKind::Conflict => AppError::ConflictError(err.to_string()),
            ErrorKind::Expired => AppError::GoneError(err.to_string()),
            ErrorKind::Invalid => AppError::ValidationError(err.to_string()),
            ErrorKind::Collaborator => AppError::Anyhow(err.into()),
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(msg) => AppError::ValidationError(msg),
            other => AppError::Anyhow(other.into()),
        }
    }
}
