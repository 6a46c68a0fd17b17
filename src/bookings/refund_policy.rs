use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Tiered cancellation refund policy.
///
/// - 24 or more hours before start: full refund
/// - 2 to 24 hours before start: 50% refund
/// - less than 2 hours before start: no refund
///
/// Boundaries are inclusive at the lower edge of each tier: exactly 24h
/// out refunds 100%, exactly 2h out refunds 50%.
pub struct RefundPolicy;

impl RefundPolicy {
    /// Compute the refund for cancelling at `now` a booking that starts at
    /// `start_time` and was paid `total`.
    pub fn refund_amount(total: Decimal, start_time: DateTime<Utc>, now: DateTime<Utc>) -> Decimal {
        let seconds_until_start = (start_time - now).num_seconds();
        let hours_until_start = Decimal::from(seconds_until_start) / Decimal::from(3600);

        if hours_until_start >= Decimal::from(24) {
            total
        } else if hours_until_start >= Decimal::from(2) {
            (total * Decimal::new(5, 1)).round_dp(2)
        } else {
            Decimal::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_full_refund_at_exactly_24_hours() {
        let start = now() + Duration::hours(24);
        assert_eq!(RefundPolicy::refund_amount(dec!(100), start, now()), dec!(100));
    }

    #[test]
    fn test_full_refund_well_in_advance() {
        let start = now() + Duration::days(7);
        assert_eq!(RefundPolicy::refund_amount(dec!(250), start, now()), dec!(250));
    }

    #[test]
    fn test_half_refund_just_under_24_hours() {
        let start = now() + Duration::hours(24) - Duration::seconds(1);
        assert_eq!(RefundPolicy::refund_amount(dec!(100), start, now()), dec!(50));
    }

    #[test]
    fn test_half_refund_at_exactly_2_hours() {
        let start = now() + Duration::hours(2);
        assert_eq!(RefundPolicy::refund_amount(dec!(100), start, now()), dec!(50));
    }

    #[test]
    fn test_no_refund_at_1h59m() {
        let start = now() + Duration::hours(1) + Duration::minutes(59);
        assert_eq!(
            RefundPolicy::refund_amount(dec!(100), start, now()),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_no_refund_after_start() {
        let start = now() - Duration::hours(1);
        assert_eq!(
            RefundPolicy::refund_amount(dec!(100), start, now()),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_half_refund_rounds_to_two_places() {
        let start = now() + Duration::hours(10);
        assert_eq!(RefundPolicy::refund_amount(dec!(99.99), start, now()), dec!(50.00));
    }

    #[cfg(test)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Refund never exceeds the amount paid and is never negative
            #[test]
            fn prop_refund_bounded_by_total(
                total_cents in 0u32..=10_000_000,
                minutes_until_start in -10_000i64..=100_000,
            ) {
                let total = Decimal::from(total_cents) / Decimal::from(100);
                let start = now() + Duration::minutes(minutes_until_start);
                let refund = RefundPolicy::refund_amount(total, start, now());

                prop_assert!(refund >= Decimal::ZERO);
                prop_assert!(refund <= total);
            }

            // Cancelling earlier never yields a smaller refund
            #[test]
            fn prop_refund_monotone_in_notice(
                total_cents in 1u32..=1_000_000,
                minutes_a in 0i64..=100_000,
                minutes_b in 0i64..=100_000,
            ) {
                let total = Decimal::from(total_cents) / Decimal::from(100);
                let (less_notice, more_notice) = if minutes_a <= minutes_b {
                    (minutes_a, minutes_b)
                } else {
                    (minutes_b, minutes_a)
                };

                let refund_less =
                    RefundPolicy::refund_amount(total, now() + Duration::minutes(less_notice), now());
                let refund_more =
                    RefundPolicy::refund_amount(total, now() + Duration::minutes(more_notice), now());

                prop_assert!(refund_less <= refund_more);
            }
        }
    }
}
