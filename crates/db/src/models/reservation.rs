//! Reservation entity model and DTOs.

use booksala_core::types::{DbId, Timestamp};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full reservation row from the `reservations` table.
///
/// `start_time`/`end_time` bound a half-open interval `[start, end)` on
/// `date`. `status` holds one of the values written by
/// `booksala_core::status::ReservationStatus`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reservation {
    pub id: DbId,
    pub user_id: DbId,
    pub room_id: DbId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub quantity: i32,
    pub reason: String,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Reservation row joined with room and owner info, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReservationDetail {
    pub id: DbId,
    pub user_id: DbId,
    pub room_id: DbId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub quantity: i32,
    pub reason: String,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub room_name: String,
    pub room_capacity: i32,
    pub user_name: Option<String>,
    pub user_matricula: String,
}

/// DTO for inserting a reservation. All values have already passed the
/// scheduling rules; edits reuse this shape with the merged final values.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReservation {
    pub user_id: DbId,
    pub room_id: DbId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub quantity: i32,
    pub reason: String,
    pub title: Option<String>,
    pub notes: Option<String>,
}
