// Authentication error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

/// Authentication error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Missing authentication token")]
    MissingToken,

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::InvalidToken => {
                warn!("Invalid token attempt");
                (StatusCode::UNAUTHORIZED, "Invalid token".to_string())
            }
            AuthError::ExpiredToken => {
                warn!("Expired token attempt");
                (StatusCode::UNAUTHORIZED, "Token has expired".to_string())
            }
            AuthError::MissingToken => {
                warn!("Missing token in request");
                (
                    StatusCode::UNAUTHORIZED,
                    "Missing authentication token".to_string(),
                )
            }
            AuthError::TokenGenerationError(msg) => {
                error!("Token generation error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
