use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::bookings::error::BookingError;
use crate::bookings::models::{Booking, BookingStatus, BookingType};

const BOOKING_COLUMNS: &str = "id, user_id, locker_id, discount_id, start_time, end_time, \
     booking_type, subtotal_amount, discount_amount, total_amount, status, \
     cancellation_reason, created_at, updated_at";

/// Repository for booking rows.
///
/// Reads go through the pool; every write belongs to a reservation or
/// cancellation transaction and takes the caller's connection.
#[derive(Clone)]
pub struct BookingsRepository {
    pool: PgPool,
}

/// Parameters for inserting a new booking inside a transaction
pub struct NewBooking {
    pub user_id: i32,
    pub locker_id: i32,
    pub discount_id: Option<i32>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub booking_type: BookingType,
    pub subtotal_amount: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub status: BookingStatus,
}

impl BookingsRepository {
    /// Create a new BookingsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a booking row inside the caller's transaction
    pub async fn insert(conn: &mut PgConnection, new: NewBooking) -> Result<Booking, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings (
                user_id, locker_id, discount_id, start_time, end_time,
                booking_type, subtotal_amount, discount_amount, total_amount, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(new.user_id)
        .bind(new.locker_id)
        .bind(new.discount_id)
        .bind(new.start_time)
        .bind(new.end_time)
        .bind(new.booking_type)
        .bind(new.subtotal_amount)
        .bind(new.discount_amount)
        .bind(new.total_amount)
        .bind(new.status)
        .fetch_one(conn)
        .await
    }

    /// Find a booking by ID
    pub async fn find_by_id(&self, booking_id: Uuid) -> Result<Option<Booking>, BookingError> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Find bookings for a user with an optional status filter,
    /// newest first
    pub async fn find_by_user_id(
        &self,
        user_id: i32,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, BookingError> {
        let bookings = match status {
            Some(status_filter) => {
                sqlx::query_as::<_, Booking>(&format!(
                    r#"
                    SELECT {BOOKING_COLUMNS}
                    FROM bookings
                    WHERE user_id = $1 AND status = $2
                    ORDER BY created_at DESC
                    "#
                ))
                .bind(user_id)
                .bind(status_filter)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Booking>(&format!(
                    r#"
                    SELECT {BOOKING_COLUMNS}
                    FROM bookings
                    WHERE user_id = $1
                    ORDER BY created_at DESC
                    "#
                ))
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(bookings)
    }

    /// Fetch a booking with an exclusive row lock, inside the caller's
    /// transaction
    pub async fn lock_booking(
        conn: &mut PgConnection,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE"
        ))
        .bind(booking_id)
        .fetch_optional(conn)
        .await
    }

    /// Update a locked booking's status
    pub async fn update_status(
        conn: &mut PgConnection,
        booking_id: Uuid,
        new_status: BookingStatus,
    ) -> Result<Booking, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(new_status)
        .bind(booking_id)
        .fetch_one(conn)
        .await
    }

    /// Mark a locked booking cancelled, storing the reason
    pub async fn mark_cancelled(
        conn: &mut PgConnection,
        booking_id: Uuid,
        reason: Option<&str>,
    ) -> Result<Booking, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET status = 'cancelled', cancellation_reason = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(reason)
        .bind(booking_id)
        .fetch_one(conn)
        .await
    }

    /// Create the payment row for a new booking inside the caller's
    /// transaction
    pub async fn insert_payment(
        conn: &mut PgConnection,
        booking_id: Uuid,
        amount: Decimal,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO payments (booking_id, amount) VALUES ($1, $2)")
            .bind(booking_id)
            .bind(amount)
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Record a refund against the booking's payment row, if one exists.
    ///
    /// The actual money movement is the payment collaborator's job; this
    /// only records the computed amount.
    pub async fn record_refund(
        conn: &mut PgConnection,
        booking_id: Uuid,
        refund_amount: Decimal,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE payments
            SET status = 'refunded', refund_amount = $1, refund_date = NOW()
            WHERE booking_id = $2
            "#,
        )
        .bind(refund_amount)
        .bind(booking_id)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// IDs of occupying bookings whose interval has lapsed, for the sweeper
    pub async fn find_lapsed_ids(&self, limit: i64) -> Result<Vec<Uuid>, BookingError> {
        let ids: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id
            FROM bookings
            WHERE end_time < NOW()
              AND status IN ('pending', 'confirmed', 'active')
            ORDER BY end_time
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }
}

// Repository methods run against live transactions and are exercised
// through the database-backed suite in src/tests.rs.
