use sqlx::{PgConnection, PgPool};

use crate::discounts::error::DiscountError;
use crate::discounts::models::{ActiveDiscountSummary, Discount};

/// Repository for discount (promo code) rows.
///
/// Codes are unique case-insensitively; lookups normalize through UPPER().
/// Usage accounting is serialized per code row: reservation transactions
/// fetch with FOR UPDATE and apply the guarded increment under that lock.
#[derive(Clone)]
pub struct DiscountsRepository {
    pool: PgPool,
}

impl DiscountsRepository {
    /// Create a new DiscountsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a discount by code, case-insensitively
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Discount>, DiscountError> {
        let discount = sqlx::query_as::<_, Discount>(
            r#"
            SELECT id, code, description, discount_type, discount_value,
                   min_booking_amount, max_discount_amount, valid_from, valid_to,
                   max_uses, current_uses, is_active
            FROM discounts
            WHERE UPPER(code) = UPPER($1)
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(discount)
    }

    /// Find a discount by code with an exclusive row lock, inside the
    /// caller's transaction. Serializes concurrent usage increments on the
    /// same code.
    pub async fn find_by_code_for_update(
        conn: &mut PgConnection,
        code: &str,
    ) -> Result<Option<Discount>, sqlx::Error> {
        sqlx::query_as::<_, Discount>(
            r#"
            SELECT id, code, description, discount_type, discount_value,
                   min_booking_amount, max_discount_amount, valid_from, valid_to,
                   max_uses, current_uses, is_active
            FROM discounts
            WHERE UPPER(code) = UPPER($1)
            FOR UPDATE
            "#,
        )
        .bind(code)
        .fetch_optional(conn)
        .await
    }

    /// Increment the usage counter, refusing to pass the cap.
    ///
    /// The cap check lives in the UPDATE itself so that two transactions
    /// racing on a cap of 1 cannot both succeed; returns false when the cap
    /// was already reached.
    pub async fn increment_uses(
        conn: &mut PgConnection,
        discount_id: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE discounts
            SET current_uses = current_uses + 1
            WHERE id = $1
              AND (max_uses IS NULL OR current_uses < max_uses)
            "#,
        )
        .bind(discount_id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List currently active promotions (public, non-sensitive fields)
    pub async fn find_active(&self) -> Result<Vec<ActiveDiscountSummary>, DiscountError> {
        let discounts = sqlx::query_as::<_, ActiveDiscountSummary>(
            r#"
            SELECT code, description, discount_type, discount_value,
                   min_booking_amount, max_discount_amount, valid_to
            FROM discounts
            WHERE is_active = TRUE
              AND NOW() >= valid_from
              AND NOW() < valid_to
              AND (max_uses IS NULL OR current_uses < max_uses)
            ORDER BY discount_value DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(discounts)
    }
}
