use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::bookings::BookingStatus;

/// Error types for access code operations
#[derive(Debug, thiserror::Error)]
pub enum AccessCodeError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Access code not found")]
    NotFound,

    #[error("Booking not found")]
    BookingNotFound,

    #[error("Forbidden")]
    Forbidden,

    #[error("Booking is {0}, no access code can be issued")]
    InvalidBookingState(BookingStatus),
}

impl From<sqlx::Error> for AccessCodeError {
    fn from(err: sqlx::Error) -> Self {
        AccessCodeError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for AccessCodeError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AccessCodeError::DatabaseError(msg) => {
                tracing::error!("Database error in access codes: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            AccessCodeError::NotFound => {
                (StatusCode::NOT_FOUND, "Access code not found".to_string())
            }
            AccessCodeError::BookingNotFound => {
                (StatusCode::NOT_FOUND, "Booking not found".to_string())
            }
            AccessCodeError::Forbidden => (
                StatusCode::FORBIDDEN,
                "You do not have permission to access this booking".to_string(),
            ),
            AccessCodeError::InvalidBookingState(state) => (
                StatusCode::CONFLICT,
                format!("Cannot issue access code: booking is {}", state),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
