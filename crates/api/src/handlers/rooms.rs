//! Handlers for the `/rooms` resource (listing, creation, availability).

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use booksala_core::error::CoreError;
use booksala_core::status::ReservationStatus;
use booksala_core::{eligibility, timeslot};
use booksala_db::models::room::{CreateRoom, Room};
use booksala_db::repositories::{ReservationRepo, RoomRepo};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /rooms` (admin only).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, message = "Room name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: i32,
    pub description: Option<String>,
}

/// Query parameters for `GET /rooms/available`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityParams {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    /// Requested party size (default 1).
    pub quantity: Option<i32>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/rooms
///
/// List all rooms.
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Room>>>> {
    let rooms = RoomRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: rooms }))
}

/// POST /api/rooms
///
/// Create a room. Admin only.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateRoomRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Room>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let room = RoomRepo::create(
        &state.pool,
        &CreateRoom {
            name: input.name,
            capacity: input.capacity,
            description: input.description,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: room })))
}

/// GET /api/rooms/available?date&startTime&endTime&quantity
///
/// List rooms bookable for the requested slot, smallest fitting first.
/// Rejects early when the caller could not book anything on that date
/// anyway, so the front end can show the precise reason instead of an
/// empty list.
pub async fn available(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<AvailabilityParams>,
) -> AppResult<Json<DataResponse<Vec<Room>>>> {
    let quantity = params.quantity.unwrap_or(1);

    // 1. Slot shape: parse, granularity, ordering, opening hours.
    let (start, end) = timeslot::validate_slot(params.date, &params.start_time, &params.end_time)?;

    // 2. Date window and wall-clock guard.
    let now = Local::now();
    eligibility::check_horizon(params.date, now.date_naive())?;
    eligibility::check_past_time(params.date, start, now.date_naive(), now.time())?;

    // 3. Per-user limits; admins book on behalf of patrons and skip these.
    if !user.is_admin() {
        let existing = ReservationRepo::find_on_date(&state.pool, user.user_id, params.date, None)
            .await?
            .and_then(|r| ReservationStatus::parse(&r.status));
        eligibility::check_daily_unique(existing)?;

        let active = ReservationRepo::count_active_for_user(&state.pool, user.user_id).await?;
        eligibility::check_quota(active)?;
    }

    // 4. Free rooms with enough capacity.
    let rooms = RoomRepo::find_available(&state.pool, params.date, start, end, quantity).await?;
    Ok(Json(DataResponse { data: rooms }))
}
