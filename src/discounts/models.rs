use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// How a discount's value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    FixedAmount,
}

/// Domain model representing a discount (promo code) row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Discount {
    pub id: i32,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_booking_amount: Decimal,
    pub max_discount_amount: Option<Decimal>,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub max_uses: Option<i32>,
    pub current_uses: i32,
    pub is_active: bool,
}

/// Outcome of pricing a code against a subtotal.
///
/// `amount` is zero whenever `is_valid` is false; `reason` explains the
/// first failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountQuote {
    pub is_valid: bool,
    pub amount: Decimal,
    pub reason: String,
}

impl DiscountQuote {
    pub fn valid(amount: Decimal) -> Self {
        Self {
            is_valid: true,
            amount,
            reason: "Discount applied successfully".to_string(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            amount: Decimal::ZERO,
            reason: reason.into(),
        }
    }
}

/// Request DTO for validating a promo code
#[derive(Debug, Deserialize, Validate)]
pub struct ValidateDiscountRequest {
    #[validate(custom = "crate::validation::validate_promo_code")]
    pub code: String,
    pub booking_amount: Decimal,
}

/// Response DTO for a discount quote
#[derive(Debug, Serialize)]
pub struct DiscountQuoteResponse {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_type: Option<DiscountType>,
    pub discount_value: Decimal,
    pub calculated_discount: Decimal,
    pub is_valid: bool,
    pub message: String,
}

/// Public summary of an active promotion
#[derive(Debug, Serialize, FromRow)]
pub struct ActiveDiscountSummary {
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_booking_amount: Decimal,
    pub max_discount_amount: Option<Decimal>,
    pub valid_to: DateTime<Utc>,
}
