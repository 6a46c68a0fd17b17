// Validation utilities module
// Provides custom validation functions for domain-specific rules

use regex::Regex;
use validator::ValidationError;

/// Validates that a promo code is 3-32 alphanumeric characters
/// (codes are compared case-insensitively, so either case is accepted here)
pub fn validate_promo_code(code: &str) -> Result<(), ValidationError> {
    let valid = Regex::new(r"^[A-Za-z0-9]{3,32}$")
        .map(|re| re.is_match(code))
        .unwrap_or(false);

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_promo_code"))
    }
}

/// Validates that a cancellation reason stays within a sane length
pub fn validate_cancellation_reason(reason: &str) -> Result<(), ValidationError> {
    if reason.len() <= 500 {
        Ok(())
    } else {
        Err(ValidationError::new("reason_too_long"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_promo_codes() {
        assert!(validate_promo_code("WELCOME20").is_ok());
        assert!(validate_promo_code("abc").is_ok());
        assert!(validate_promo_code("Summer2024").is_ok());
    }

    #[test]
    fn test_invalid_promo_codes() {
        assert!(validate_promo_code("").is_err());
        assert!(validate_promo_code("ab").is_err());
        assert!(validate_promo_code("HAS SPACE").is_err());
        assert!(validate_promo_code("emoji🎉").is_err());
        assert!(validate_promo_code(&"X".repeat(33)).is_err());
    }

    #[test]
    fn test_cancellation_reason_length() {
        assert!(validate_cancellation_reason("changed my plans").is_ok());
        assert!(validate_cancellation_reason(&"x".repeat(500)).is_ok());
        assert!(validate_cancellation_reason(&"x".repeat(501)).is_err());
    }
}
