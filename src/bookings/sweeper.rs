use std::time::Duration;

use sqlx::PgPool;
use uuid::Uuid;

use crate::bookings::{BookingError, BookingStatus, BookingsRepository, StatusMachine};
use crate::lockers::{LockerRepository, LockerStatus};

const SWEEP_BATCH_SIZE: i64 = 100;

/// Run the expiry sweeper on an interval until the process exits.
///
/// Spawned from main as a background task. `lock_wait` bounds every row
/// lock acquisition, like the reservation and cancellation paths.
pub async fn run(pool: PgPool, interval: Duration, lock_wait: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        match sweep_once(&pool, lock_wait).await {
            Ok(0) => {}
            Ok(swept) => tracing::info!("Expiry sweep settled {} bookings", swept),
            Err(e) => tracing::error!("Expiry sweep failed: {}", e),
        }
    }
}

/// Settle bookings whose interval has lapsed while still occupying their
/// locker: active ones complete, the rest expire, and the locker is
/// released.
///
/// Each booking gets its own transaction, locking the booking row and then
/// the locker row - the same order cancellation uses. The lapsed-ID scan is
/// unlocked, so each candidate is re-checked under its lock; a booking the
/// user cancelled in the meantime is simply skipped, as is one whose locks
/// cannot be taken within `lock_wait` (the next sweep retries it).
pub async fn sweep_once(pool: &PgPool, lock_wait: Duration) -> Result<usize, BookingError> {
    let repo = BookingsRepository::new(pool.clone());
    let lapsed = repo.find_lapsed_ids(SWEEP_BATCH_SIZE).await?;

    let mut swept = 0;
    for booking_id in lapsed {
        match settle_booking(pool, booking_id, lock_wait).await {
            Ok(true) => swept += 1,
            Ok(false) => {}
            Err(BookingError::ResourceBusy) => {
                tracing::warn!("Booking {} is locked, leaving it for the next sweep", booking_id);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(swept)
}

async fn settle_booking(
    pool: &PgPool,
    booking_id: Uuid,
    lock_wait: Duration,
) -> Result<bool, BookingError> {
    let mut tx = pool.begin().await?;

    let booking = match tokio::time::timeout(
        lock_wait,
        BookingsRepository::lock_booking(&mut tx, booking_id),
    )
    .await
    .map_err(|_| BookingError::ResourceBusy)??
    {
        Some(booking) => booking,
        None => return Ok(false),
    };

    // Re-check under the lock: the booking may have been cancelled (or
    // already settled by another instance) since the scan.
    if booking.end_time >= chrono::Utc::now() || !booking.status.is_occupying() {
        return Ok(false);
    }

    let target = if booking.status == BookingStatus::Active {
        BookingStatus::Completed
    } else {
        BookingStatus::Expired
    };
    let new_status = match StatusMachine::transition(booking.status, target) {
        Ok(status) => status,
        Err(msg) => {
            tracing::warn!("Skipping booking {}: {}", booking_id, msg);
            return Ok(false);
        }
    };

    BookingsRepository::update_status(&mut tx, booking_id, new_status).await?;

    let locker = tokio::time::timeout(
        lock_wait,
        LockerRepository::lock_unit(&mut tx, booking.locker_id),
    )
    .await
    .map_err(|_| BookingError::ResourceBusy)??
    .ok_or(BookingError::LockerNotFound(booking.locker_id))?;
    if locker.status == LockerStatus::Booked {
        LockerRepository::set_status(&mut tx, booking.locker_id, LockerStatus::Available).await?;
    }

    tx.commit().await?;

    tracing::debug!(
        "Settled lapsed booking {} as {}, locker {} released",
        booking_id,
        new_status,
        booking.locker_id
    );

    Ok(true)
}
