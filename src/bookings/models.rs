use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Booking status enum representing the lifecycle of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
    Expired,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Active => "active",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Expired => "expired",
        }
    }

    /// Statuses that occupy a locker and participate in conflict detection
    pub fn is_occupying(&self) -> bool {
        matches!(
            self,
            BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::Active
        )
    }

    /// Terminal statuses admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::Expired
        )
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the locker is reserved for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    Storage,
    Delivery,
}

/// Domain model representing a booking row.
///
/// The interval is half-open: the locker is occupied for
/// [start_time, end_time).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
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
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a booking
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub locker_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub booking_type: BookingType,
    #[validate(custom = "crate::validation::validate_promo_code")]
    pub discount_code: Option<String>,
}

/// Request DTO for cancelling a booking
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CancelBookingRequest {
    #[validate(custom = "crate::validation::validate_cancellation_reason")]
    pub reason: Option<String>,
}

/// Response DTO for a cancellation with its computed refund
#[derive(Debug, Serialize)]
pub struct CancelBookingResponse {
    pub booking_id: Uuid,
    pub status: BookingStatus,
    pub refund_amount: Decimal,
}

/// Response DTO for a booking
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub user_id: i32,
    pub locker_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub booking_type: BookingType,
    pub subtotal_amount: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub status: BookingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            user_id: booking.user_id,
            locker_id: booking.locker_id,
            start_time: booking.start_time,
            end_time: booking.end_time,
            booking_type: booking.booking_type,
            subtotal_amount: booking.subtotal_amount,
            discount_amount: booking.discount_amount,
            total_amount: booking.total_amount,
            status: booking.status,
            cancellation_reason: booking.cancellation_reason,
            created_at: booking.created_at,
        }
    }
}

/// Query parameters for booking history
#[derive(Debug, Deserialize)]
pub struct BookingHistoryQuery {
    /// Optional status filter
    pub status: Option<BookingStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [BookingStatus; 6] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Active,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
        BookingStatus::Expired,
    ];

    #[test]
    fn test_occupying_and_terminal_partition_statuses() {
        // Every status is exactly one of: occupying a locker, or settled
        for status in ALL_STATUSES {
            assert_ne!(
                status.is_occupying(),
                status.is_terminal(),
                "{} must be occupying xor terminal",
                status
            );
        }
    }

    #[test]
    fn test_status_round_trips_through_as_str() {
        for status in ALL_STATUSES {
            assert_eq!(format!("{}", status), status.as_str());
        }
    }
}
