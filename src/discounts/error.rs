use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error types for discount operations
#[derive(Debug, thiserror::Error)]
pub enum DiscountError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<sqlx::Error> for DiscountError {
    fn from(err: sqlx::Error) -> Self {
        DiscountError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for DiscountError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            DiscountError::DatabaseError(msg) => {
                tracing::error!("Database error in discounts: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            DiscountError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
