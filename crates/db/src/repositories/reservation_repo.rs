//! Repository for the `reservations` table.
//!
//! Creation and edits run inside a transaction that locks the room row
//! before the conflict check, so two concurrent requests for the same room
//! serialize and the second one sees the first one's booking.

use booksala_core::types::DbId;
use chrono::{NaiveDate, NaiveTime};
use sqlx::{PgConnection, PgPool};

use crate::models::reservation::{CreateReservation, Reservation, ReservationDetail};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, room_id, date, start_time, end_time, quantity, \
                        reason, title, notes, status, created_at, updated_at";

/// Joined select used by listings; aliases match [`ReservationDetail`].
const DETAIL_SELECT: &str = "SELECT r.id, r.user_id, r.room_id, r.date, r.start_time, \
     r.end_time, r.quantity, r.reason, r.title, r.notes, r.status, r.created_at, \
     r.updated_at, rm.name AS room_name, rm.capacity AS room_capacity, \
     u.name AS user_name, u.matricula AS user_matricula \
     FROM reservations r \
     JOIN rooms rm ON rm.id = r.room_id \
     JOIN users u ON u.id = r.user_id";

/// Outcome of a checked insert or update.
#[derive(Debug)]
pub enum ReservationWrite {
    /// The row was written.
    Written(Reservation),
    /// Active reservations already occupy the requested slot.
    Conflict(Vec<Reservation>),
    /// The referenced room does not exist.
    RoomNotFound,
    /// The reservation was no longer active when the update ran.
    NotActive,
}

/// Provides CRUD operations for reservations.
pub struct ReservationRepo;

impl ReservationRepo {
    /// Find a reservation by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reservations WHERE id = $1");
        sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Active reservations owned by `user_id`, soonest first.
    pub async fn list_active_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ReservationDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT} WHERE r.user_id = $1 AND r.status = 'active'
             ORDER BY r.date, r.start_time"
        );
        sqlx::query_as::<_, ReservationDetail>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// All active reservations, soonest first. Admin listing.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<ReservationDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT} WHERE r.status = 'active' ORDER BY r.date, r.start_time"
        );
        sqlx::query_as::<_, ReservationDetail>(&query)
            .fetch_all(pool)
            .await
    }

    /// One page of finished (completed or cancelled) reservations, newest
    /// first. `user_id = None` spans all users.
    pub async fn history(
        pool: &PgPool,
        user_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReservationDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE r.status IN ('completed', 'cancelled')
               AND ($1::BIGINT IS NULL OR r.user_id = $1)
             ORDER BY r.date DESC, r.start_time DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ReservationDetail>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of finished reservations for the history pager.
    pub async fn history_count(
        pool: &PgPool,
        user_id: Option<DbId>,
    ) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM reservations
             WHERE status IN ('completed', 'cancelled')
               AND ($1::BIGINT IS NULL OR user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count.0)
    }

    /// Number of active reservations held by `user_id`, for the quota rule.
    pub async fn count_active_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM reservations WHERE user_id = $1 AND status = 'active'",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count.0)
    }

    /// The caller's counting reservation on `date`, if any, for the
    /// one-per-day rule. Cancelled rows never count; `exclude` skips the
    /// reservation being edited.
    pub async fn find_on_date(
        pool: &PgPool,
        user_id: DbId,
        date: NaiveDate,
        exclude: Option<DbId>,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reservations
             WHERE user_id = $1 AND date = $2
               AND status IN ('active', 'completed')
               AND ($3::BIGINT IS NULL OR id <> $3)
             ORDER BY id
             LIMIT 1"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(user_id)
            .bind(date)
            .bind(exclude)
            .fetch_optional(pool)
            .await
    }

    /// Active reservations on the same room and date intersecting the
    /// half-open slot `[start, end)`.
    pub async fn find_conflicts(
        pool: &PgPool,
        room_id: DbId,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        exclude: Option<DbId>,
    ) -> Result<Vec<Reservation>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::conflicts_on(&mut conn, room_id, date, start, end, exclude).await
    }

    /// Insert a reservation after re-checking conflicts under a room-row
    /// lock. The lock closes the window between reading existing bookings
    /// and writing the new one.
    pub async fn create_checked(
        pool: &PgPool,
        input: &CreateReservation,
    ) -> Result<ReservationWrite, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !Self::lock_room(&mut tx, input.room_id).await? {
            return Ok(ReservationWrite::RoomNotFound);
        }
        let conflicts = Self::conflicts_on(
            &mut tx,
            input.room_id,
            input.date,
            input.start_time,
            input.end_time,
            None,
        )
        .await?;
        if !conflicts.is_empty() {
            return Ok(ReservationWrite::Conflict(conflicts));
        }

        let query = format!(
            "INSERT INTO reservations
                 (user_id, room_id, date, start_time, end_time, quantity, reason, title, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Reservation>(&query)
            .bind(input.user_id)
            .bind(input.room_id)
            .bind(input.date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.quantity)
            .bind(&input.reason)
            .bind(&input.title)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(ReservationWrite::Written(row))
    }

    /// Rewrite an active reservation with merged final values, re-checking
    /// conflicts under the room-row lock and excluding the row itself.
    pub async fn update_checked(
        pool: &PgPool,
        id: DbId,
        input: &CreateReservation,
    ) -> Result<ReservationWrite, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !Self::lock_room(&mut tx, input.room_id).await? {
            return Ok(ReservationWrite::RoomNotFound);
        }
        let conflicts = Self::conflicts_on(
            &mut tx,
            input.room_id,
            input.date,
            input.start_time,
            input.end_time,
            Some(id),
        )
        .await?;
        if !conflicts.is_empty() {
            return Ok(ReservationWrite::Conflict(conflicts));
        }

        let query = format!(
            "UPDATE reservations SET
                 room_id = $2, date = $3, start_time = $4, end_time = $5,
                 quantity = $6, reason = $7, title = $8, notes = $9,
                 updated_at = NOW()
             WHERE id = $1 AND status = 'active'
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .bind(input.room_id)
            .bind(input.date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.quantity)
            .bind(&input.reason)
            .bind(&input.title)
            .bind(&input.notes)
            .fetch_optional(&mut *tx)
            .await?;
        match row {
            Some(row) => {
                tx.commit().await?;
                Ok(ReservationWrite::Written(row))
            }
            None => Ok(ReservationWrite::NotActive),
        }
    }

    /// Flip an active reservation to cancelled.
    ///
    /// Returns `None` if the reservation is not active (already finished
    /// or cancelled), leaving terminal states untouched.
    pub async fn cancel(pool: &PgPool, id: DbId) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!(
            "UPDATE reservations SET status = 'cancelled', updated_at = NOW()
             WHERE id = $1 AND status = 'active'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Complete every active reservation whose slot has fully passed:
    /// earlier dates, or today's rows whose end time is at or before `now`.
    ///
    /// Returns the number of rows flipped. Used by the background sweep
    /// and the manual admin trigger.
    pub async fn complete_past(
        pool: &PgPool,
        today: NaiveDate,
        now: NaiveTime,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE reservations SET status = 'completed', updated_at = NOW()
             WHERE status = 'active'
               AND (date < $1 OR (date = $1 AND end_time <= $2))",
        )
        .bind(today)
        .bind(now)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Take the room row lock. Returns `false` when the room is missing.
    async fn lock_room(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        room_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as("SELECT id FROM rooms WHERE id = $1 FOR UPDATE")
            .bind(room_id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(row.is_some())
    }

    async fn conflicts_on(
        conn: &mut PgConnection,
        room_id: DbId,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        exclude: Option<DbId>,
    ) -> Result<Vec<Reservation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reservations
             WHERE room_id = $1 AND date = $2 AND status = 'active'
               AND start_time < $4 AND end_time > $3
               AND ($5::BIGINT IS NULL OR id <> $5)
             ORDER BY start_time"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(room_id)
            .bind(date)
            .bind(start)
            .bind(end)
            .bind(exclude)
            .fetch_all(conn)
            .await
    }
}
