use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::bookings::BookingStatus;

/// Physical size category of a locker unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LockerSize {
    Small,
    Medium,
    Large,
}

/// Locker unit status.
///
/// The status is a derived lock: it must always agree with the presence or
/// absence of an active booking on the unit. Only the repository mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LockerStatus {
    Available,
    Booked,
    Maintenance,
    OutOfService,
}

impl LockerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockerStatus::Available => "available",
            LockerStatus::Booked => "booked",
            LockerStatus::Maintenance => "maintenance",
            LockerStatus::OutOfService => "outofservice",
        }
    }
}

impl std::fmt::Display for LockerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Domain model representing a locker unit row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LockerUnit {
    pub id: i32,
    pub location_id: i32,
    pub unit_number: String,
    pub size: LockerSize,
    pub tier_id: i32,
    pub status: LockerStatus,
}

/// Pricing configuration associated with a locker size
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PricingTier {
    pub id: i32,
    pub name: String,
    pub hourly_rate: Decimal,
    pub daily_rate: Decimal,
    pub weekly_rate: Option<Decimal>,
}

/// Locker listing row with location and rate details joined in
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct LockerListing {
    pub id: i32,
    pub location_id: i32,
    pub location_name: String,
    pub unit_number: String,
    pub size: LockerSize,
    pub status: LockerStatus,
    pub hourly_rate: Decimal,
    pub daily_rate: Decimal,
}

/// Query parameters for the availability check endpoint
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// A booking that overlaps a requested interval
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ConflictSummary {
    pub booking_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
}

/// Response for the availability check endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub locker_id: i32,
    pub requested_start: DateTime<Utc>,
    pub requested_end: DateTime<Utc>,
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub conflicts: Vec<ConflictSummary>,
}
