use sqlx::{PgConnection, PgPool};

use crate::lockers::error::LockerError;
use crate::lockers::models::{LockerListing, LockerStatus, LockerUnit, PricingTier};

/// Repository for locker unit state: the resource registry.
///
/// Pool-backed methods serve reads; the transaction-scoped associated
/// functions implement the exclusive lease on a unit row. A lock taken with
/// [`LockerRepository::lock_unit`] is held until the caller's transaction
/// commits or rolls back, so it releases on every exit path.
#[derive(Clone)]
pub struct LockerRepository {
    pool: PgPool,
}

impl LockerRepository {
    /// Create a new LockerRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a locker unit by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<LockerUnit>, LockerError> {
        let locker = sqlx::query_as::<_, LockerUnit>(
            "SELECT id, location_id, unit_number, size, tier_id, status FROM locker_units WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(locker)
    }

    /// List all locker units with their location name and rates
    pub async fn find_all(&self) -> Result<Vec<LockerListing>, LockerError> {
        let lockers = sqlx::query_as::<_, LockerListing>(
            r#"
            SELECT
                lu.id, lu.location_id, l.name AS location_name,
                lu.unit_number, lu.size, lu.status,
                pt.hourly_rate, pt.daily_rate
            FROM locker_units lu
            INNER JOIN locations l ON lu.location_id = l.id
            INNER JOIN pricing_tiers pt ON lu.tier_id = pt.id
            ORDER BY lu.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(lockers)
    }

    /// Find one locker listing with location and rates joined in
    pub async fn find_listing(&self, id: i32) -> Result<Option<LockerListing>, LockerError> {
        let locker = sqlx::query_as::<_, LockerListing>(
            r#"
            SELECT
                lu.id, lu.location_id, l.name AS location_name,
                lu.unit_number, lu.size, lu.status,
                pt.hourly_rate, pt.daily_rate
            FROM locker_units lu
            INNER JOIN locations l ON lu.location_id = l.id
            INNER JOIN pricing_tiers pt ON lu.tier_id = pt.id
            WHERE lu.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(locker)
    }

    /// Acquire an exclusive, transaction-scoped lock on a unit row.
    ///
    /// Blocks concurrent lockers on the same id until the transaction ends.
    /// Returns `None` if the id does not exist.
    pub async fn lock_unit(
        conn: &mut PgConnection,
        locker_id: i32,
    ) -> Result<Option<LockerUnit>, sqlx::Error> {
        sqlx::query_as::<_, LockerUnit>(
            r#"
            SELECT id, location_id, unit_number, size, tier_id, status
            FROM locker_units
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(locker_id)
        .fetch_optional(conn)
        .await
    }

    /// Update the status of a locked unit.
    ///
    /// Callers must hold the row lock from [`Self::lock_unit`] on the same
    /// transaction.
    pub async fn set_status(
        conn: &mut PgConnection,
        locker_id: i32,
        status: LockerStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE locker_units SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(locker_id)
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Fetch the pricing tier for a locker, inside the caller's transaction
    pub async fn tier_for_locker(
        conn: &mut PgConnection,
        locker_id: i32,
    ) -> Result<Option<PricingTier>, sqlx::Error> {
        sqlx::query_as::<_, PricingTier>(
            r#"
            SELECT pt.id, pt.name, pt.hourly_rate, pt.daily_rate, pt.weekly_rate
            FROM locker_units lu
            INNER JOIN pricing_tiers pt ON lu.tier_id = pt.id
            WHERE lu.id = $1
            "#,
        )
        .bind(locker_id)
        .fetch_optional(conn)
        .await
    }
}

// Locking behavior requires a live Postgres transaction and is covered
// through the database-backed suite in src/tests.rs.
