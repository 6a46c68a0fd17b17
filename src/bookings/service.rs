use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::bookings::{
    Booking, BookingError, BookingHistoryQuery, BookingStatus, BookingsRepository,
    CancelBookingResponse, CreateBookingRequest, NewBooking, PriceCalculator, RefundPolicy,
    StatusMachine,
};
use crate::config::AppConfig;
use crate::discounts::{DiscountQuote, DiscountValidator, DiscountsRepository};
use crate::lockers::{
    AvailabilityChecker, AvailabilityResponse, LockerRepository, LockerStatus,
};

/// Service orchestrating the reservation lifecycle.
///
/// Every state-changing operation runs inside exactly one database
/// transaction holding an exclusive row lock on the targeted locker (and
/// booking, for cancellation). Conflicts are locker-scoped, so this
/// serialization is all the coordination needed.
#[derive(Clone)]
pub struct BookingService {
    pool: PgPool,
    bookings_repo: BookingsRepository,
    locker_repo: LockerRepository,
    config: AppConfig,
}

impl BookingService {
    /// Create a new BookingService
    pub fn new(
        pool: PgPool,
        bookings_repo: BookingsRepository,
        locker_repo: LockerRepository,
        config: AppConfig,
    ) -> Self {
        Self {
            pool,
            bookings_repo,
            locker_repo,
            config,
        }
    }

    /// Create a reservation.
    ///
    /// Protocol, single atomic transaction:
    /// 1. Lock the locker row; reject non-available units.
    /// 2. Conflict check against occupying bookings (same transaction).
    /// 3. Price the interval.
    /// 4. Validate and apply the discount code, if any.
    /// 5. Compute the total.
    /// 6. Insert the booking as confirmed.
    /// 7. Mark the locker booked.
    /// 8. Commit. Any failure rolls back every step.
    pub async fn create_reservation(
        &self,
        user_id: i32,
        request: CreateBookingRequest,
    ) -> Result<Booking, BookingError> {
        let now = Utc::now();

        // Validation happens before any lock is taken
        if request.start_time >= request.end_time {
            return Err(BookingError::InvalidTimeRange(
                "End time must be after start time".to_string(),
            ));
        }
        if request.start_time < now {
            return Err(BookingError::InvalidTimeRange(
                "Cannot book in the past".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        // Step 1: exclusive lease on the unit row, bounded wait
        let locker = tokio::time::timeout(
            self.config.lock_wait_timeout,
            LockerRepository::lock_unit(&mut tx, request.locker_id),
        )
        .await
        .map_err(|_| BookingError::ResourceBusy)??
        .ok_or(BookingError::LockerNotFound(request.locker_id))?;

        if locker.status != LockerStatus::Available {
            return Err(BookingError::UnitUnavailable(locker.status.to_string()));
        }

        // Step 2: conflict check under the same lock
        let conflicts = AvailabilityChecker::find_conflicts(
            &mut *tx,
            request.locker_id,
            request.start_time,
            request.end_time,
            None,
        )
        .await?;

        if !conflicts.is_empty() {
            return Err(BookingError::TimeConflict);
        }

        // Step 3: price
        let tier = LockerRepository::tier_for_locker(&mut tx, request.locker_id)
            .await?
            .ok_or_else(|| {
                BookingError::DatabaseError(format!(
                    "pricing tier missing for locker {}",
                    request.locker_id
                ))
            })?;
        let subtotal = PriceCalculator::subtotal(&tier, request.start_time, request.end_time);

        // Step 4: discount
        let (discount_id, discount_amount) = match request.discount_code.as_deref() {
            Some(code) => self.apply_discount(&mut tx, code, subtotal).await?,
            None => (None, Decimal::ZERO),
        };

        // Step 5: total, rounded only here
        let total = PriceCalculator::finalize((subtotal - discount_amount).max(Decimal::ZERO));

        // Step 6: insert as confirmed
        let booking = BookingsRepository::insert(
            &mut tx,
            NewBooking {
                user_id,
                locker_id: request.locker_id,
                discount_id,
                start_time: request.start_time,
                end_time: request.end_time,
                booking_type: request.booking_type,
                subtotal_amount: PriceCalculator::finalize(subtotal),
                discount_amount: PriceCalculator::finalize(discount_amount),
                total_amount: total,
                status: BookingStatus::Confirmed,
            },
        )
        .await?;

        BookingsRepository::insert_payment(&mut tx, booking.id, total).await?;

        // Step 7: locker status mirrors the active booking
        LockerRepository::set_status(&mut tx, request.locker_id, LockerStatus::Booked).await?;

        // Step 8
        tx.commit().await?;

        tracing::info!(
            "Created booking {} for user {} on locker {} ({} - {}), total {}",
            booking.id,
            user_id,
            booking.locker_id,
            booking.start_time,
            booking.end_time,
            booking.total_amount
        );

        Ok(booking)
    }

    /// Validate a code against the subtotal and consume one use, all under
    /// the discount row lock.
    ///
    /// In lenient mode (default) a failed code degrades to a zero discount;
    /// in strict mode it aborts the reservation.
    async fn apply_discount(
        &self,
        conn: &mut PgConnection,
        code: &str,
        subtotal: Decimal,
    ) -> Result<(Option<i32>, Decimal), BookingError> {
        let discount = DiscountsRepository::find_by_code_for_update(conn, code).await?;

        let (discount, quote) = match discount {
            Some(discount) => {
                let quote = DiscountValidator::quote(&discount, subtotal, Utc::now());
                (Some(discount), quote)
            }
            None => (None, DiscountQuote::invalid("Invalid discount code")),
        };

        if quote.is_valid {
            // The validator's cap check was advisory; the guarded increment
            // is what actually prevents two transactions racing past
            // max_uses.
            let discount = discount.ok_or_else(|| {
                BookingError::DatabaseError("discount row vanished under lock".to_string())
            })?;
            let applied = DiscountsRepository::increment_uses(conn, discount.id).await?;

            if applied {
                return Ok((Some(discount.id), quote.amount));
            }

            let reason = "Discount code usage limit reached".to_string();
            if self.config.strict_discounts {
                return Err(BookingError::DiscountInvalid(reason));
            }
            tracing::warn!("Discount code {} rejected: {}", code, reason);
            return Ok((None, Decimal::ZERO));
        }

        if self.config.strict_discounts {
            return Err(BookingError::DiscountInvalid(quote.reason));
        }

        tracing::debug!(
            "Ignoring discount code {} on lenient policy: {}",
            code,
            quote.reason
        );
        Ok((None, Decimal::ZERO))
    }

    /// Cancel a booking and compute the tiered refund.
    ///
    /// Locks the booking row, then the locker row, updates both and records
    /// the refund in one transaction. The sweeper takes its locks in the
    /// same order.
    pub async fn cancel_booking(
        &self,
        booking_id: Uuid,
        requesting_user_id: i32,
        reason: Option<String>,
    ) -> Result<CancelBookingResponse, BookingError> {
        let mut tx = self.pool.begin().await?;

        let booking = tokio::time::timeout(
            self.config.lock_wait_timeout,
            BookingsRepository::lock_booking(&mut tx, booking_id),
        )
        .await
        .map_err(|_| BookingError::ResourceBusy)??
        .ok_or(BookingError::NotFound)?;

        if booking.user_id != requesting_user_id {
            return Err(BookingError::Forbidden);
        }

        if StatusMachine::transition(booking.status, BookingStatus::Cancelled).is_err() {
            return Err(BookingError::AlreadyTerminal(booking.status));
        }

        let refund_amount =
            RefundPolicy::refund_amount(booking.total_amount, booking.start_time, Utc::now());

        let cancelled =
            BookingsRepository::mark_cancelled(&mut tx, booking_id, reason.as_deref()).await?;

        // Release the unit under its own lock; administrative states
        // (maintenance, out of service) are left alone.
        let locker = tokio::time::timeout(
            self.config.lock_wait_timeout,
            LockerRepository::lock_unit(&mut tx, booking.locker_id),
        )
        .await
        .map_err(|_| BookingError::ResourceBusy)??
        .ok_or(BookingError::LockerNotFound(booking.locker_id))?;
        if locker.status == LockerStatus::Booked {
            LockerRepository::set_status(&mut tx, booking.locker_id, LockerStatus::Available)
                .await?;
        }

        if refund_amount > Decimal::ZERO {
            BookingsRepository::record_refund(&mut tx, booking_id, refund_amount).await?;
        }

        tx.commit().await?;

        tracing::info!(
            "Cancelled booking {} for user {}, refund {}",
            booking_id,
            requesting_user_id,
            refund_amount
        );

        Ok(CancelBookingResponse {
            booking_id,
            status: cancelled.status,
            refund_amount,
        })
    }

    /// Check whether a locker is free for [start, end).
    ///
    /// Read-only; takes no locks. The authoritative check re-runs under the
    /// locker lock during reservation.
    pub async fn check_availability(
        &self,
        locker_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<AvailabilityResponse, BookingError> {
        if start >= end {
            return Err(BookingError::InvalidTimeRange(
                "End time must be after start time".to_string(),
            ));
        }

        let locker = self
            .locker_repo
            .find_by_id(locker_id)
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?
            .ok_or(BookingError::LockerNotFound(locker_id))?;

        if matches!(
            locker.status,
            LockerStatus::Maintenance | LockerStatus::OutOfService
        ) {
            return Ok(AvailabilityResponse {
                locker_id,
                requested_start: start,
                requested_end: end,
                is_available: false,
                reason: Some(format!("Locker is currently {}", locker.status)),
                conflicts: vec![],
            });
        }

        let conflicts =
            AvailabilityChecker::find_conflicts(&self.pool, locker_id, start, end, None).await?;

        Ok(AvailabilityResponse {
            locker_id,
            requested_start: start,
            requested_end: end,
            is_available: conflicts.is_empty(),
            reason: None,
            conflicts,
        })
    }

    /// Get a booking by ID, verifying ownership
    pub async fn get_booking(
        &self,
        booking_id: Uuid,
        user_id: i32,
    ) -> Result<Booking, BookingError> {
        let booking = self
            .bookings_repo
            .find_by_id(booking_id)
            .await?
            .ok_or(BookingError::NotFound)?;

        if booking.user_id != user_id {
            return Err(BookingError::Forbidden);
        }

        Ok(booking)
    }

    /// Get all bookings for a user with an optional status filter
    pub async fn get_user_bookings(
        &self,
        user_id: i32,
        query: BookingHistoryQuery,
    ) -> Result<Vec<Booking>, BookingError> {
        self.bookings_repo.find_by_user_id(user_id, query.status).await
    }
}

// The reservation protocol requires live Postgres transactions and row
// locks; the concurrency properties (racing reservations, discount cap
// race, bounded lock waits) are covered by the database-backed suite in
// src/tests.rs. The pure pieces it composes - pricing, discount quoting,
// refund tiers, overlap detection, status transitions - are unit-tested in
// their own modules.
