// HTTP handlers for discount endpoints

use axum::{extract::State, Json};
use chrono::Utc;
use rust_decimal::Decimal;
use validator::Validate;

use crate::discounts::{
    ActiveDiscountSummary, DiscountError, DiscountQuoteResponse, DiscountValidator,
    ValidateDiscountRequest,
};

/// Handler for POST /api/discounts/validate
/// Quotes a promo code against a booking amount without consuming a use
pub async fn validate_discount_handler(
    State(state): State<crate::AppState>,
    Json(request): Json<ValidateDiscountRequest>,
) -> Result<Json<DiscountQuoteResponse>, DiscountError> {
    request
        .validate()
        .map_err(|e| DiscountError::ValidationError(e.to_string()))?;

    let code = request.code.trim().to_uppercase();
    tracing::debug!("Validating discount code: {}", code);

    let discount = state.discounts_repo.find_by_code(&code).await?;

    let response = match discount {
        None => DiscountQuoteResponse {
            code,
            discount_type: None,
            discount_value: Decimal::ZERO,
            calculated_discount: Decimal::ZERO,
            is_valid: false,
            message: "Invalid discount code".to_string(),
        },
        Some(discount) => {
            let quote = DiscountValidator::quote(&discount, request.booking_amount, Utc::now());

            DiscountQuoteResponse {
                code: discount.code,
                discount_type: Some(discount.discount_type),
                discount_value: discount.discount_value,
                calculated_discount: quote.amount.round_dp(2),
                is_valid: quote.is_valid,
                message: quote.reason,
            }
        }
    };

    Ok(Json(response))
}

/// Handler for GET /api/discounts/active
/// Lists currently active promotions (public)
pub async fn get_active_discounts_handler(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<ActiveDiscountSummary>>, DiscountError> {
    let discounts = state.discounts_repo.find_active().await?;

    tracing::debug!("Found {} active discounts", discounts.len());
    Ok(Json(discounts))
}
