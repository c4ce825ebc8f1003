//! Handlers for the `/reservations` resource.
//!
//! Creation and edits funnel every request through the same rule pipeline
//! (slot shape, horizon, past-time, capacity, daily uniqueness, quota)
//! before handing the write to the repository, which re-checks conflicts
//! under a room-row lock.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use booksala_core::error::CoreError;
use booksala_core::status::ReservationStatus;
use booksala_core::types::DbId;
use booksala_core::{eligibility, timeslot};
use booksala_db::models::reservation::{CreateReservation, Reservation, ReservationDetail};
use booksala_db::repositories::{ReservationRepo, ReservationWrite, RoomRepo};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Fixed page size of the history listing.
const HISTORY_PAGE_SIZE: i64 = 3;

/// Default booking reason when the client sends none.
const DEFAULT_REASON: &str = "Outro";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /reservations`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub room_id: DbId,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    /// Party size (default 1).
    pub quantity: Option<i32>,
    pub reason: Option<String>,
    pub title: Option<String>,
    pub notes: Option<String>,
}

/// Request body for `PUT /reservations/{id}`. Absent fields keep their
/// current values.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationRequest {
    pub room_id: Option<DbId>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub quantity: Option<i32>,
    pub reason: Option<String>,
    pub title: Option<String>,
    pub notes: Option<String>,
}

/// One page of the history listing.
#[derive(Debug, Serialize)]
pub struct HistoryPage {
    pub items: Vec<ReservationDetail>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// Result of a manual completion sweep.
#[derive(Debug, Serialize)]
pub struct SweepOutcome {
    /// Number of reservations flipped to completed.
    pub completed: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/reservations
///
/// The caller's active reservations, or all active reservations for admins.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ReservationDetail>>>> {
    let items = if user.is_admin() {
        ReservationRepo::list_active(&state.pool).await?
    } else {
        ReservationRepo::list_active_for_user(&state.pool, user.user_id).await?
    };
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/reservations/history?page=N
///
/// Finished (completed or cancelled) reservations, newest first, three per
/// page. Admins see every user's history.
pub async fn history(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<HistoryPage>>> {
    let page = params.page.unwrap_or(1).max(1);
    let offset = (page - 1) * HISTORY_PAGE_SIZE;
    let filter = if user.is_admin() {
        None
    } else {
        Some(user.user_id)
    };

    let items = ReservationRepo::history(&state.pool, filter, HISTORY_PAGE_SIZE, offset).await?;
    let total = ReservationRepo::history_count(&state.pool, filter).await?;
    let total_pages = (total + HISTORY_PAGE_SIZE - 1) / HISTORY_PAGE_SIZE;

    Ok(Json(DataResponse {
        data: HistoryPage {
            items,
            page,
            page_size: HISTORY_PAGE_SIZE,
            total,
            total_pages,
        },
    }))
}

/// POST /api/reservations
///
/// Create a reservation after running the full rule pipeline.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Reservation>>)> {
    let quantity = input.quantity.unwrap_or(1);

    // 1. Slot shape: parse, granularity, ordering, opening hours.
    let (start, end) = timeslot::validate_slot(input.date, &input.start_time, &input.end_time)?;

    // 2. Date window and wall-clock guard.
    let now = Local::now();
    eligibility::check_horizon(input.date, now.date_naive())?;
    eligibility::check_past_time(input.date, start, now.date_naive(), now.time())?;

    // 3. Room must exist and hold the party.
    let room = RoomRepo::find_by_id(&state.pool, input.room_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Room",
            id: input.room_id,
        }))?;
    eligibility::check_capacity(quantity, room.capacity)?;

    // 4. Per-user limits; admins are exempt.
    if !user.is_admin() {
        let existing = ReservationRepo::find_on_date(&state.pool, user.user_id, input.date, None)
            .await?
            .and_then(|r| ReservationStatus::parse(&r.status));
        eligibility::check_daily_unique(existing)?;

        let active = ReservationRepo::count_active_for_user(&state.pool, user.user_id).await?;
        eligibility::check_quota(active)?;
    }

    // 5. Insert under the room-row lock; the repository re-checks conflicts.
    let outcome = ReservationRepo::create_checked(
        &state.pool,
        &CreateReservation {
            user_id: user.user_id,
            room_id: input.room_id,
            date: input.date,
            start_time: start,
            end_time: end,
            quantity,
            reason: input.reason.unwrap_or_else(|| DEFAULT_REASON.to_string()),
            title: input.title,
            notes: input.notes,
        },
    )
    .await?;

    match outcome {
        ReservationWrite::Written(row) => {
            tracing::info!(reservation_id = row.id, user_id = user.user_id, "Reservation created");
            Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
        }
        ReservationWrite::Conflict(_) => Err(AppError::Core(CoreError::Conflict(
            "The room is already reserved for the requested time slot".into(),
        ))),
        ReservationWrite::RoomNotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Room",
            id: input.room_id,
        })),
        ReservationWrite::NotActive => Err(AppError::InternalError(
            "Insert reported a stale reservation row".into(),
        )),
    }
}

/// PUT /api/reservations/{id}
///
/// Edit an active reservation (owner or admin). Absent fields keep their
/// current values; the merged result passes through the full rule pipeline
/// again, excluding the reservation's own slot from conflict checks.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateReservationRequest>,
) -> AppResult<Json<DataResponse<Reservation>>> {
    // 1. Load and authorize.
    let existing = ReservationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Reservation",
            id,
        }))?;

    if existing.user_id != user.user_id && !user.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only modify your own reservations".into(),
        )));
    }

    if existing.status != ReservationStatus::Active.as_str() {
        return Err(AppError::Core(CoreError::Conflict(
            "Only active reservations can be edited".into(),
        )));
    }

    // 2. Merge the request over the stored row.
    let room_id = input.room_id.unwrap_or(existing.room_id);
    let date = input.date.unwrap_or(existing.date);
    let start_raw = input
        .start_time
        .unwrap_or_else(|| existing.start_time.format("%H:%M").to_string());
    let end_raw = input
        .end_time
        .unwrap_or_else(|| existing.end_time.format("%H:%M").to_string());
    let quantity = input.quantity.unwrap_or(existing.quantity);
    let reason = input.reason.unwrap_or(existing.reason);
    let title = input.title.or(existing.title);
    let notes = input.notes.or(existing.notes);

    // 3. Re-run the rule pipeline on the merged values.
    let (start, end) = timeslot::validate_slot(date, &start_raw, &end_raw)?;

    let now = Local::now();
    eligibility::check_horizon(date, now.date_naive())?;
    eligibility::check_past_time(date, start, now.date_naive(), now.time())?;

    let room = RoomRepo::find_by_id(&state.pool, room_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Room",
            id: room_id,
        }))?;
    eligibility::check_capacity(quantity, room.capacity)?;

    // Daily uniqueness skips the row being edited; the active-count quota
    // is unaffected by an edit, so it is not re-checked here.
    if !user.is_admin() {
        let other = ReservationRepo::find_on_date(&state.pool, existing.user_id, date, Some(id))
            .await?
            .and_then(|r| ReservationStatus::parse(&r.status));
        eligibility::check_daily_unique(other)?;
    }

    // 4. Rewrite under the room-row lock.
    let outcome = ReservationRepo::update_checked(
        &state.pool,
        id,
        &CreateReservation {
            user_id: existing.user_id,
            room_id,
            date,
            start_time: start,
            end_time: end,
            quantity,
            reason,
            title,
            notes,
        },
    )
    .await?;

    match outcome {
        ReservationWrite::Written(row) => {
            tracing::info!(reservation_id = row.id, user_id = user.user_id, "Reservation updated");
            Ok(Json(DataResponse { data: row }))
        }
        ReservationWrite::Conflict(_) => Err(AppError::Core(CoreError::Conflict(
            "The room is already reserved for the requested time slot".into(),
        ))),
        ReservationWrite::RoomNotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Room",
            id: room_id,
        })),
        ReservationWrite::NotActive => Err(AppError::Core(CoreError::Conflict(
            "Reservation is no longer active".into(),
        ))),
    }
}

/// DELETE /api/reservations/{id}
///
/// Cancel an active reservation (owner or admin). The row is kept and
/// flipped to cancelled so it stays visible in the history.
pub async fn cancel(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Reservation>>> {
    let existing = ReservationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Reservation",
            id,
        }))?;

    if existing.user_id != user.user_id && !user.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only cancel your own reservations".into(),
        )));
    }

    let row = ReservationRepo::cancel(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict("Reservation is not active".into()))
        })?;

    tracing::info!(reservation_id = row.id, user_id = user.user_id, "Reservation cancelled");
    Ok(Json(DataResponse { data: row }))
}

/// POST /api/reservations/complete-past
///
/// Manually trigger the completion sweep. Admin only; the background job
/// runs the same flip on an interval.
pub async fn complete_past(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<SweepOutcome>>> {
    let now = Local::now();
    let completed = ReservationRepo::complete_past(&state.pool, now.date_naive(), now.time()).await?;

    if completed > 0 {
        tracing::info!(completed, "Manual completion sweep flipped reservations");
    }
    Ok(Json(DataResponse {
        data: SweepOutcome { completed },
    }))
}
