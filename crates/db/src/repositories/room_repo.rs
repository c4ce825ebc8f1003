//! Repository for the `rooms` table.

use booksala_core::types::DbId;
use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;

use crate::models::room::{CreateRoom, Room};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, capacity, description, created_at, updated_at";

/// Provides CRUD operations for rooms.
pub struct RoomRepo;

impl RoomRepo {
    /// Insert a new room, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateRoom) -> Result<Room, sqlx::Error> {
        let query = format!(
            "INSERT INTO rooms (name, capacity, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(&input.name)
            .bind(input.capacity)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a room by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms WHERE id = $1");
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all rooms.
    pub async fn list(pool: &PgPool) -> Result<Vec<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms ORDER BY id");
        sqlx::query_as::<_, Room>(&query).fetch_all(pool).await
    }

    /// List rooms free for the half-open slot `[start, end)` on `date`
    /// with capacity for `quantity` people, smallest fitting rooms first.
    ///
    /// A room is occupied when any *active* reservation on that date
    /// intersects the slot.
    pub async fn find_available(
        pool: &PgPool,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        quantity: i32,
    ) -> Result<Vec<Room>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rooms
             WHERE capacity >= $1
               AND NOT EXISTS (
                   SELECT 1 FROM reservations
                    WHERE room_id = rooms.id
                      AND date = $2
                      AND status = 'active'
                      AND start_time < $4
                      AND end_time > $3
               )
             ORDER BY capacity, name"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(quantity)
            .bind(date)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }
}
