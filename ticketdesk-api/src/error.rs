use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use ticketdesk_core::BookingError;

pub const NOT_FOUND_MESSAGE: &str = "Booking not found";

#[derive(Debug)]
pub enum AppError {
    NotFoundError(String),
    ConflictError(String),
    ValidationError(String),
    InternalServerError(String),
    RejectedRequest(StatusCode, String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::RejectedRequest(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::RejectedRequest(rejection.status(), rejection.body_text())
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NotFound(key) => AppError::NotFoundError(key),
            BookingError::Conflict(msg) => AppError::ConflictError(msg),
            BookingError::Validation(msg) => AppError::ValidationError(msg),
            BookingError::Storage(msg) | BookingError::Export(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFoundError(key) => {
                tracing::debug!("Booking lookup missed: {}", key);
                (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE.to_string())
            }
            AppError::ConflictError(msg) => {
                tracing::warn!("Booking conflict: {}", msg);
                (StatusCode::CONFLICT, msg)
            }
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::RejectedRequest(status, msg) => (status, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "message": message,
        }));

        (status, body).into_response()
    }
}
