// Authentication middleware for protected routes

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};

use crate::auth::{error::AuthError, models::Role, token::TokenService};
use crate::config::AppConfig;

/// Authenticated user extractor for protected routes.
///
/// The verification secret comes from the application's [`AppConfig`], so
/// the state must expose it via `FromRef`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub role: Role,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Extract Authorization header
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken)?;

        // Verify Bearer token format
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let config = AppConfig::from_ref(state);
        let token_service = TokenService::new(config.jwt_secret);
        let claims = token_service.validate_access_token(token)?;

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use std::time::Duration;

    // AppConfig is Clone, so it can serve as the extractor state directly
    fn test_config() -> AppConfig {
        AppConfig {
            database_url: "postgresql://unused".to_string(),
            jwt_secret: "test_secret_key_for_testing_purposes".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            strict_discounts: false,
            lock_wait_timeout: Duration::from_secs(1),
            sweep_interval: Duration::from_secs(60),
        }
    }

    fn create_parts_with_auth(auth_value: &str) -> Parts {
        let req = Request::builder()
            .uri("/")
            .header(header::AUTHORIZATION, auth_value)
            .body(())
            .unwrap();

        let (parts, _) = req.into_parts();
        parts
    }

    #[tokio::test]
    async fn test_valid_token_is_accepted() {
        let config = test_config();
        let service = TokenService::new(config.jwt_secret.clone());
        let token = service.generate_access_token(42, Role::Customer).unwrap();

        let mut parts = create_parts_with_auth(&format!("Bearer {}", token));
        let result = AuthenticatedUser::from_request_parts(&mut parts, &config).await;

        let user = result.unwrap();
        assert_eq!(user.user_id, 42);
        assert_eq!(user.role, Role::Customer);
    }

    #[tokio::test]
    async fn test_missing_authorization_header() {
        let req = Request::builder().uri("/").body(()).unwrap();
        let (mut parts, _) = req.into_parts();

        let result = AuthenticatedUser::from_request_parts(&mut parts, &test_config()).await;
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[tokio::test]
    async fn test_invalid_bearer_format() {
        let config = test_config();

        for auth_value in ["InvalidFormat token", "token_without_bearer", "Basic dXNlcjpwYXNz"] {
            let mut parts = create_parts_with_auth(auth_value);
            let result = AuthenticatedUser::from_request_parts(&mut parts, &config).await;
            assert!(result.is_err());
        }
    }

    #[tokio::test]
    async fn test_malformed_token_is_rejected() {
        let mut parts = create_parts_with_auth("Bearer not.a.valid.jwt");
        let result = AuthenticatedUser::from_request_parts(&mut parts, &test_config()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_rejected() {
        let other = TokenService::new("a_completely_different_secret".to_string());
        let token = other.generate_access_token(42, Role::Customer).unwrap();

        let mut parts = create_parts_with_auth(&format!("Bearer {}", token));
        let result = AuthenticatedUser::from_request_parts(&mut parts, &test_config()).await;
        assert!(result.is_err());
    }
}
