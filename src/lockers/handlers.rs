// HTTP handlers for locker registry endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::bookings::BookingError;
use crate::lockers::{AvailabilityQuery, AvailabilityResponse, LockerError, LockerListing};

/// Handler for GET /api/lockers
/// Lists all locker units with location and rate information
#[utoipa::path(
    get,
    path = "/api/lockers",
    responses(
        (status = 200, description = "List of all locker units", body = Vec<LockerListing>),
        (status = 500, description = "Internal server error")
    ),
    tag = "lockers"
)]
pub async fn list_lockers_handler(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<LockerListing>>, LockerError> {
    tracing::debug!("Fetching all lockers");

    let lockers = state.locker_repo.find_all().await?;

    tracing::debug!("Retrieved {} lockers", lockers.len());
    Ok(Json(lockers))
}

/// Handler for GET /api/lockers/:id
/// Retrieves a specific locker unit by ID
#[utoipa::path(
    get,
    path = "/api/lockers/{id}",
    params(
        ("id" = i32, Path, description = "Locker unit ID")
    ),
    responses(
        (status = 200, description = "Locker found", body = LockerListing),
        (status = 404, description = "Locker not found")
    ),
    tag = "lockers"
)]
pub async fn get_locker_by_id_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> Result<Json<LockerListing>, LockerError> {
    tracing::debug!("Fetching locker with id: {}", id);

    let locker = state
        .locker_repo
        .find_listing(id)
        .await?
        .ok_or(LockerError::NotFound(id))?;

    Ok(Json(locker))
}

/// Handler for GET /api/lockers/:id/availability
/// Checks whether a locker is free for a requested time slot
#[utoipa::path(
    get,
    path = "/api/lockers/{id}/availability",
    params(
        ("id" = i32, Path, description = "Locker unit ID"),
        ("start_time" = String, Query, description = "Desired start time (RFC 3339)"),
        ("end_time" = String, Query, description = "Desired end time (RFC 3339)")
    ),
    responses(
        (status = 200, description = "Availability status with any conflicting bookings", body = AvailabilityResponse),
        (status = 400, description = "Invalid time range"),
        (status = 404, description = "Locker not found")
    ),
    tag = "lockers"
)]
pub async fn check_availability_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, BookingError> {
    tracing::debug!(
        "Checking availability for locker {} from {} to {}",
        id,
        query.start_time,
        query.end_time
    );

    let response = state
        .booking_service
        .check_availability(id, query.start_time, query.end_time)
        .await?;

    Ok(Json(response))
}
