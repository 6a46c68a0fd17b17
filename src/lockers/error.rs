use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error types for locker registry operations
#[derive(Debug, thiserror::Error)]
pub enum LockerError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Locker not found: {0}")]
    NotFound(i32),
}

impl From<sqlx::Error> for LockerError {
    fn from(err: sqlx::Error) -> Self {
        LockerError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for LockerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            LockerError::DatabaseError(msg) => {
                tracing::error!("Database error in locker registry: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            LockerError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("Locker with id {} not found", id),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
