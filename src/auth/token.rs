// JWT token validation service
//
// Token issuance (login/registration) is handled by the surrounding system;
// this service only verifies tokens and extracts the caller's identity.
// Generation is kept for the test suite and for tooling.

use crate::auth::error::AuthError;
use crate::auth::models::Role;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32, // user_id
    pub role: Role,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
}

/// Token service for JWT operations
pub struct TokenService {
    secret: String,
    access_token_duration: i64, // in seconds
}

impl TokenService {
    /// Create a new TokenService with secret key.
    /// Access tokens expire in 15 minutes (900 seconds).
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            access_token_duration: 900,
        }
    }

    /// Generate an access token for a user
    pub fn generate_access_token(&self, user_id: i32, role: Role) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let exp = now + self.access_token_duration;

        let claims = Claims {
            sub: user_id,
            role,
            iat: now,
            exp,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Validate an access token and return its claims
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::default();

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            if e.to_string().contains("ExpiredSignature") {
                AuthError::ExpiredToken
            } else {
                AuthError::InvalidToken
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_token_service() -> TokenService {
        TokenService::new("test_secret_key_for_testing_purposes".to_string())
    }

    #[test]
    fn test_token_claims_contain_user_identity() {
        let service = test_token_service();
        let token = service.generate_access_token(42, Role::Customer).unwrap();
        let claims = service.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, Role::Customer);
    }

    #[test]
    fn test_access_token_expiration_is_15_minutes() {
        let service = test_token_service();
        let token = service.generate_access_token(1, Role::Customer).unwrap();
        let claims = service.validate_access_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let service = test_token_service();

        assert!(service.validate_access_token("").is_err());
        assert!(service.validate_access_token("not.a.token").is_err());
        assert!(service
            .validate_access_token("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid.signature")
            .is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let claims = Claims {
            sub: 1,
            role: Role::Customer,
            iat: Utc::now().timestamp() - 1000,
            exp: Utc::now().timestamp() - 500,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test_secret_key_for_testing_purposes".as_bytes()),
        )
        .unwrap();

        let result = test_token_service().validate_access_token(&token);
        assert!(matches!(result, Err(AuthError::ExpiredToken)));
    }

    #[test]
    fn test_token_signature_verification() {
        let service1 = TokenService::new("secret1".to_string());
        let service2 = TokenService::new("secret2".to_string());

        let token = service1.generate_access_token(1, Role::Admin).unwrap();

        assert!(service1.validate_access_token(&token).is_ok());
        assert!(service2.validate_access_token(&token).is_err());
    }
}
