// Time-overlap conflict detection for locker bookings

use chrono::{DateTime, Utc};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::lockers::models::ConflictSummary;

/// Half-open interval overlap: [s1, e1) and [s2, e2) conflict iff
/// `s1 < e2 && s2 < e1`. A booking ending exactly when another starts is
/// not a conflict.
pub fn intervals_overlap(
    s1: DateTime<Utc>,
    e1: DateTime<Utc>,
    s2: DateTime<Utc>,
    e2: DateTime<Utc>,
) -> bool {
    s1 < e2 && s2 < e1
}

/// Conflict lookup against bookings still occupying a locker.
///
/// Scoped to statuses {pending, confirmed, active}. When called during a
/// reservation, the executor must be the transaction already holding the
/// locker row lock, otherwise the check races with concurrent writers.
pub struct AvailabilityChecker;

impl AvailabilityChecker {
    /// Find all bookings on `locker_id` whose interval overlaps
    /// [start, end), optionally excluding one booking id (used when a
    /// booking is being modified rather than created).
    pub async fn find_conflicts<'e, E>(
        executor: E,
        locker_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_booking_id: Option<Uuid>,
    ) -> Result<Vec<ConflictSummary>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let conflicts = match exclude_booking_id {
            Some(exclude) => {
                sqlx::query_as::<_, ConflictSummary>(
                    r#"
                    SELECT id AS booking_id, start_time, end_time, status
                    FROM bookings
                    WHERE locker_id = $1
                      AND status IN ('pending', 'confirmed', 'active')
                      AND start_time < $3
                      AND end_time > $2
                      AND id != $4
                    ORDER BY start_time
                    "#,
                )
                .bind(locker_id)
                .bind(start)
                .bind(end)
                .bind(exclude)
                .fetch_all(executor)
                .await?
            }
            None => {
                sqlx::query_as::<_, ConflictSummary>(
                    r#"
                    SELECT id AS booking_id, start_time, end_time, status
                    FROM bookings
                    WHERE locker_id = $1
                      AND status IN ('pending', 'confirmed', 'active')
                      AND start_time < $3
                      AND end_time > $2
                    ORDER BY start_time
                    "#,
                )
                .bind(locker_id)
                .bind(start)
                .bind(end)
                .fetch_all(executor)
                .await?
            }
        };

        Ok(conflicts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_overlapping_intervals_conflict() {
        assert!(intervals_overlap(t(10), t(12), t(11), t(13)));
        assert!(intervals_overlap(t(11), t(13), t(10), t(12)));
    }

    #[test]
    fn test_contained_interval_conflicts() {
        assert!(intervals_overlap(t(10), t(14), t(11), t(12)));
        assert!(intervals_overlap(t(11), t(12), t(10), t(14)));
    }

    #[test]
    fn test_identical_intervals_conflict() {
        assert!(intervals_overlap(t(10), t(12), t(10), t(12)));
    }

    #[test]
    fn test_adjacent_intervals_do_not_conflict() {
        // Half-open semantics: ending exactly when another starts is fine
        assert!(!intervals_overlap(t(10), t(12), t(12), t(14)));
        assert!(!intervals_overlap(t(12), t(14), t(10), t(12)));
    }

    #[test]
    fn test_disjoint_intervals_do_not_conflict() {
        assert!(!intervals_overlap(t(8), t(9), t(12), t(14)));
        assert!(!intervals_overlap(t(12), t(14), t(8), t(9)));
    }

    #[cfg(test)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Overlap is symmetric in its two intervals
            #[test]
            fn prop_overlap_is_symmetric(
                s1 in 0i64..1000, d1 in 1i64..100,
                s2 in 0i64..1000, d2 in 1i64..100,
            ) {
                let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
                let a = base + chrono::Duration::hours(s1);
                let b = a + chrono::Duration::hours(d1);
                let c = base + chrono::Duration::hours(s2);
                let d = c + chrono::Duration::hours(d2);

                prop_assert_eq!(
                    intervals_overlap(a, b, c, d),
                    intervals_overlap(c, d, a, b)
                );
            }

            // An interval always conflicts with itself
            #[test]
            fn prop_interval_conflicts_with_itself(
                s in 0i64..1000, d in 1i64..100,
            ) {
                let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
                let a = base + chrono::Duration::hours(s);
                let b = a + chrono::Duration::hours(d);

                prop_assert!(intervals_overlap(a, b, a, b));
            }
        }
    }
}
