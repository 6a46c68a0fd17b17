// Promo code validation and pricing
//
// Pure logic: given a discount row, a subtotal and "now", produce a quote.
// Checks short-circuit in a fixed order so the reported reason is always
// the first failure. Usage-cap enforcement at read time here is advisory;
// the authoritative check happens in the repository's guarded increment.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::discounts::models::{Discount, DiscountQuote, DiscountType};

pub struct DiscountValidator;

impl DiscountValidator {
    /// Price a discount against a subtotal.
    ///
    /// Check order: active flag, validity window [valid_from, valid_to),
    /// usage cap, minimum booking amount. The resulting amount is capped by
    /// `max_discount_amount` and clamped to the subtotal so the net total
    /// can never go negative.
    pub fn quote(discount: &Discount, subtotal: Decimal, now: DateTime<Utc>) -> DiscountQuote {
        if !discount.is_active {
            return DiscountQuote::invalid("Discount code is inactive");
        }

        if now < discount.valid_from {
            return DiscountQuote::invalid("Discount code is not yet valid");
        }

        if now >= discount.valid_to {
            return DiscountQuote::invalid("Discount code has expired");
        }

        if let Some(max_uses) = discount.max_uses {
            if discount.current_uses >= max_uses {
                return DiscountQuote::invalid("Discount code usage limit reached");
            }
        }

        if subtotal < discount.min_booking_amount {
            return DiscountQuote::invalid(format!(
                "Minimum booking amount is {}",
                discount.min_booking_amount
            ));
        }

        let mut amount = match discount.discount_type {
            DiscountType::Percentage => {
                subtotal * discount.discount_value / Decimal::from(100)
            }
            DiscountType::FixedAmount => discount.discount_value,
        };

        if let Some(cap) = discount.max_discount_amount {
            amount = amount.min(cap);
        }

        // Never discount below a zero net total
        amount = amount.min(subtotal);

        DiscountQuote::valid(amount)
    }
}
