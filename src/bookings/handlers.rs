// HTTP handlers for booking endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::bookings::{
    BookingError, BookingHistoryQuery, BookingResponse, CancelBookingRequest,
    CancelBookingResponse, CreateBookingRequest,
};

/// Handler for POST /api/bookings
/// Creates a reservation for the authenticated user
pub async fn create_booking_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), BookingError> {
    request
        .validate()
        .map_err(|e| BookingError::ValidationError(e.to_string()))?;

    tracing::debug!(
        "User {} requesting locker {} from {} to {}",
        user.user_id,
        request.locker_id,
        request.start_time,
        request.end_time
    );

    let booking = state
        .booking_service
        .create_reservation(user.user_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// Handler for GET /api/bookings
/// Lists the authenticated user's bookings, optionally filtered by status
pub async fn get_bookings_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Query(query): Query<BookingHistoryQuery>,
) -> Result<Json<Vec<BookingResponse>>, BookingError> {
    let bookings = state
        .booking_service
        .get_user_bookings(user.user_id, query)
        .await?;

    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

/// Handler for GET /api/bookings/:id
/// Retrieves one of the authenticated user's bookings
pub async fn get_booking_by_id_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, BookingError> {
    let booking = state.booking_service.get_booking(id, user.user_id).await?;

    Ok(Json(booking.into()))
}

/// Handler for POST /api/bookings/:id/cancel
/// Cancels a booking and reports the refund
pub async fn cancel_booking_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    request: Option<Json<CancelBookingRequest>>,
) -> Result<Json<CancelBookingResponse>, BookingError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    request
        .validate()
        .map_err(|e| BookingError::ValidationError(e.to_string()))?;

    let response = state
        .booking_service
        .cancel_booking(id, user.user_id, request.reason)
        .await?;

    Ok(Json(response))
}
