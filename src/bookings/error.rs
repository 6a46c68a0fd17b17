use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::bookings::models::BookingStatus;

/// Error types for reservation operations
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Booking not found")]
    NotFound,

    #[error("Locker not found: {0}")]
    LockerNotFound(i32),

    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("Locker is {0}")]
    UnitUnavailable(String),

    #[error("Time slot conflicts with existing booking")]
    TimeConflict,

    #[error("Invalid discount code: {0}")]
    DiscountInvalid(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Booking is already {0}")]
    AlreadyTerminal(BookingStatus),

    #[error("Resource is busy, try again")]
    ResourceBusy,

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<sqlx::Error> for BookingError {
    fn from(err: sqlx::Error) -> Self {
        BookingError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            BookingError::DatabaseError(msg) => {
                tracing::error!("Database error in bookings: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            BookingError::NotFound => (StatusCode::NOT_FOUND, "Booking not found".to_string()),
            BookingError::LockerNotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("Locker with id {} not found", id),
            ),
            BookingError::InvalidTimeRange(msg) => (StatusCode::BAD_REQUEST, msg),
            BookingError::UnitUnavailable(state) => {
                (StatusCode::CONFLICT, format!("Locker is {}", state))
            }
            BookingError::TimeConflict => (
                StatusCode::CONFLICT,
                "Time slot conflicts with existing booking".to_string(),
            ),
            BookingError::DiscountInvalid(msg) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid discount code: {}", msg),
            ),
            BookingError::Forbidden => (
                StatusCode::FORBIDDEN,
                "You do not have permission to access this booking".to_string(),
            ),
            BookingError::AlreadyTerminal(status) => (
                StatusCode::CONFLICT,
                format!("Cannot cancel: booking is {}", status),
            ),
            BookingError::ResourceBusy => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Resource is busy, try again".to_string(),
            ),
            BookingError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
