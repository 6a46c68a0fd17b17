// HTTP handlers for access code endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::access::{AccessCodeError, AccessCodeQuery, AccessCodeResponse, AccessCodeType};
use crate::auth::AuthenticatedUser;

/// Handler for GET /api/bookings/:id/access-code
/// Issues (or reuses) a door code for the authenticated user's booking
pub async fn get_access_code_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(booking_id): Path<Uuid>,
    Query(query): Query<AccessCodeQuery>,
) -> Result<Json<AccessCodeResponse>, AccessCodeError> {
    let code_type = query.code_type.unwrap_or(AccessCodeType::Unlock);

    let code = state
        .access_service
        .issue_or_reuse(booking_id, user.user_id, code_type)
        .await?;

    Ok(Json(code.into()))
}

/// Handler for POST /api/access-codes/:id/use
/// Redeems a door code
pub async fn use_access_code_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(code_id): Path<Uuid>,
) -> Result<Json<AccessCodeResponse>, AccessCodeError> {
    let code = state
        .access_service
        .mark_used(code_id, user.user_id)
        .await?;

    Ok(Json(code.into()))
}
