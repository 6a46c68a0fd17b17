use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::access::{
    AccessCode, AccessCodeError, AccessCodeType, AccessCodesRepository, CodeGenerator,
};
use crate::bookings::{BookingStatus, BookingsRepository};

/// Service issuing and redeeming locker door codes
#[derive(Clone)]
pub struct AccessCodeService {
    pool: PgPool,
    repo: AccessCodesRepository,
}

impl AccessCodeService {
    /// Create a new AccessCodeService
    pub fn new(pool: PgPool, repo: AccessCodesRepository) -> Self {
        Self { pool, repo }
    }

    /// Return the booking's live code of the requested type, generating one
    /// if none exists.
    ///
    /// Runs under the booking row lock so two concurrent requests cannot
    /// both generate; the second reuses the first's code. Codes expire with
    /// the booking interval.
    pub async fn issue_or_reuse(
        &self,
        booking_id: Uuid,
        requesting_user_id: i32,
        code_type: AccessCodeType,
    ) -> Result<AccessCode, AccessCodeError> {
        let mut tx = self.pool.begin().await?;

        let booking = BookingsRepository::lock_booking(&mut tx, booking_id)
            .await?
            .ok_or(AccessCodeError::BookingNotFound)?;

        if booking.user_id != requesting_user_id {
            return Err(AccessCodeError::Forbidden);
        }

        if !matches!(
            booking.status,
            BookingStatus::Confirmed | BookingStatus::Active
        ) {
            return Err(AccessCodeError::InvalidBookingState(booking.status));
        }

        if let Some(existing) =
            AccessCodesRepository::find_reusable(&mut tx, booking_id, code_type).await?
        {
            // A stored code that no longer matches the expected shape
            // (manual edit, partial migration) is abandoned in favor of a
            // fresh one.
            if CodeGenerator::is_well_formed(&existing.code) {
                tx.commit().await?;
                return Ok(existing);
            }
            tracing::warn!(
                "Stored access code {} for booking {} is malformed, regenerating",
                existing.id,
                booking_id
            );
        }

        let now = Utc::now();
        let code_string = CodeGenerator::generate(booking_id, code_type, now);
        let code = AccessCodesRepository::insert(
            &mut tx,
            booking_id,
            &code_string,
            code_type,
            booking.end_time,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            "Issued {} access code for booking {}",
            code_type,
            booking_id
        );

        Ok(code)
    }

    /// Redeem a code for its owner. Single-use, but redeeming an
    /// already-used code succeeds without changing used_at.
    pub async fn mark_used(
        &self,
        code_id: Uuid,
        requesting_user_id: i32,
    ) -> Result<AccessCode, AccessCodeError> {
        let code = self
            .repo
            .find_by_id(code_id)
            .await?
            .ok_or(AccessCodeError::NotFound)?;

        let bookings_repo = BookingsRepository::new(self.pool.clone());
        let booking = bookings_repo
            .find_by_id(code.booking_id)
            .await
            .map_err(|e| AccessCodeError::DatabaseError(e.to_string()))?
            .ok_or(AccessCodeError::BookingNotFound)?;

        if booking.user_id != requesting_user_id {
            return Err(AccessCodeError::Forbidden);
        }

        let code = self
            .repo
            .mark_used(code_id)
            .await?
            .ok_or(AccessCodeError::NotFound)?;

        tracing::info!("Access code {} redeemed", code_id);

        Ok(code)
    }
}
