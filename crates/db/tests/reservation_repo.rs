use booksala_db::models::{CreateReservation, CreateRoom, CreateUser, Reservation, Room, User};
use booksala_db::repositories::{ReservationRepo, ReservationWrite, RoomRepo, UserRepo};
use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

async fn seed_user(pool: &PgPool, matricula: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            matricula: matricula.to_string(),
            password_hash: "hash".to_string(),
            role: "user".to_string(),
            name: None,
        },
    )
    .await
    .unwrap()
}

async fn seed_room(pool: &PgPool, name: &str, capacity: i32) -> Room {
    RoomRepo::create(
        pool,
        &CreateRoom {
            name: name.to_string(),
            capacity,
            description: None,
        },
    )
    .await
    .unwrap()
}

fn booking(user: &User, room: &Room, d: NaiveDate, start: (u32, u32), end: (u32, u32)) -> CreateReservation {
    CreateReservation {
        user_id: user.id,
        room_id: room.id,
        date: d,
        start_time: time(start.0, start.1),
        end_time: time(end.0, end.1),
        quantity: 1,
        reason: "Outro".to_string(),
        title: None,
        notes: None,
    }
}

fn written(outcome: ReservationWrite) -> Reservation {
    match outcome {
        ReservationWrite::Written(r) => r,
        other => panic!("expected Written, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Conflict detection
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn overlapping_booking_is_rejected(pool: PgPool) {
    let user = seed_user(&pool, "1234567").await;
    let room = seed_room(&pool, "Sala 101", 6).await;
    let d = date(2026, 8, 10);

    written(
        ReservationRepo::create_checked(&pool, &booking(&user, &room, d, (10, 0), (11, 0)))
            .await
            .unwrap(),
    );

    let outcome =
        ReservationRepo::create_checked(&pool, &booking(&user, &room, d, (10, 30), (11, 30)))
            .await
            .unwrap();
    match outcome {
        ReservationWrite::Conflict(rows) => assert_eq!(rows.len(), 1),
        other => panic!("expected Conflict, got {other:?}"),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn back_to_back_bookings_are_accepted(pool: PgPool) {
    let user = seed_user(&pool, "1234567").await;
    let room = seed_room(&pool, "Sala 101", 6).await;
    let d = date(2026, 8, 10);

    written(
        ReservationRepo::create_checked(&pool, &booking(&user, &room, d, (10, 0), (11, 0)))
            .await
            .unwrap(),
    );
    written(
        ReservationRepo::create_checked(&pool, &booking(&user, &room, d, (11, 0), (12, 0)))
            .await
            .unwrap(),
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn cancelled_booking_frees_the_slot(pool: PgPool) {
    let user = seed_user(&pool, "1234567").await;
    let room = seed_room(&pool, "Sala 101", 6).await;
    let d = date(2026, 8, 10);

    let first = written(
        ReservationRepo::create_checked(&pool, &booking(&user, &room, d, (10, 0), (11, 0)))
            .await
            .unwrap(),
    );
    ReservationRepo::cancel(&pool, first.id).await.unwrap().unwrap();

    written(
        ReservationRepo::create_checked(&pool, &booking(&user, &room, d, (10, 0), (11, 0)))
            .await
            .unwrap(),
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn other_rooms_and_dates_do_not_conflict(pool: PgPool) {
    let user = seed_user(&pool, "1234567").await;
    let room_a = seed_room(&pool, "Sala 101", 6).await;
    let room_b = seed_room(&pool, "Sala 102", 8).await;
    let d = date(2026, 8, 10);

    written(
        ReservationRepo::create_checked(&pool, &booking(&user, &room_a, d, (10, 0), (11, 0)))
            .await
            .unwrap(),
    );
    // Same slot, different room.
    written(
        ReservationRepo::create_checked(&pool, &booking(&user, &room_b, d, (10, 0), (11, 0)))
            .await
            .unwrap(),
    );
    // Same room, next day.
    written(
        ReservationRepo::create_checked(
            &pool,
            &booking(&user, &room_a, date(2026, 8, 11), (10, 0), (11, 0)),
        )
        .await
        .unwrap(),
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn missing_room_is_reported(pool: PgPool) {
    let user = seed_user(&pool, "1234567").await;
    let room = seed_room(&pool, "Sala 101", 6).await;
    let mut input = booking(&user, &room, date(2026, 8, 10), (10, 0), (11, 0));
    input.room_id = room.id + 100;

    let outcome = ReservationRepo::create_checked(&pool, &input).await.unwrap();
    assert!(matches!(outcome, ReservationWrite::RoomNotFound));
}

// ---------------------------------------------------------------------------
// Edits
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn edit_does_not_conflict_with_itself(pool: PgPool) {
    let user = seed_user(&pool, "1234567").await;
    let room = seed_room(&pool, "Sala 101", 6).await;
    let d = date(2026, 8, 10);

    let row = written(
        ReservationRepo::create_checked(&pool, &booking(&user, &room, d, (10, 0), (11, 0)))
            .await
            .unwrap(),
    );

    // Shift within its own original window.
    let updated = written(
        ReservationRepo::update_checked(&pool, row.id, &booking(&user, &room, d, (10, 15), (11, 15)))
            .await
            .unwrap(),
    );
    assert_eq!(updated.start_time, time(10, 15));
}

#[sqlx::test(migrations = "./migrations")]
async fn edit_of_cancelled_reservation_is_rejected(pool: PgPool) {
    let user = seed_user(&pool, "1234567").await;
    let room = seed_room(&pool, "Sala 101", 6).await;
    let d = date(2026, 8, 10);

    let row = written(
        ReservationRepo::create_checked(&pool, &booking(&user, &room, d, (10, 0), (11, 0)))
            .await
            .unwrap(),
    );
    ReservationRepo::cancel(&pool, row.id).await.unwrap().unwrap();

    let outcome =
        ReservationRepo::update_checked(&pool, row.id, &booking(&user, &room, d, (12, 0), (13, 0)))
            .await
            .unwrap();
    assert!(matches!(outcome, ReservationWrite::NotActive));
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn cancel_is_idempotent_only_for_active_rows(pool: PgPool) {
    let user = seed_user(&pool, "1234567").await;
    let room = seed_room(&pool, "Sala 101", 6).await;

    let row = written(
        ReservationRepo::create_checked(
            &pool,
            &booking(&user, &room, date(2026, 8, 10), (10, 0), (11, 0)),
        )
        .await
        .unwrap(),
    );

    let cancelled = ReservationRepo::cancel(&pool, row.id).await.unwrap().unwrap();
    assert_eq!(cancelled.status, "cancelled");
    // Second cancel finds no active row.
    assert!(ReservationRepo::cancel(&pool, row.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn sweep_completes_only_fully_past_slots(pool: PgPool) {
    let user = seed_user(&pool, "1234567").await;
    let room = seed_room(&pool, "Sala 101", 6).await;
    let today = date(2026, 8, 10);

    let yesterday = written(
        ReservationRepo::create_checked(
            &pool,
            &booking(&user, &room, date(2026, 8, 9), (10, 0), (11, 0)),
        )
        .await
        .unwrap(),
    );
    let ended = written(
        ReservationRepo::create_checked(&pool, &booking(&user, &room, today, (8, 0), (9, 0)))
            .await
            .unwrap(),
    );
    let ongoing = written(
        ReservationRepo::create_checked(&pool, &booking(&user, &room, today, (9, 30), (12, 0)))
            .await
            .unwrap(),
    );
    let tomorrow = written(
        ReservationRepo::create_checked(
            &pool,
            &booking(&user, &room, date(2026, 8, 11), (10, 0), (11, 0)),
        )
        .await
        .unwrap(),
    );

    let flipped = ReservationRepo::complete_past(&pool, today, time(10, 0)).await.unwrap();
    assert_eq!(flipped, 2);

    for (id, expected) in [
        (yesterday.id, "completed"),
        (ended.id, "completed"),
        (ongoing.id, "active"),
        (tomorrow.id, "active"),
    ] {
        let row = ReservationRepo::find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(row.status, expected);
    }
}

// ---------------------------------------------------------------------------
// Per-user lookups
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn daily_lookup_ignores_cancelled_and_excluded_rows(pool: PgPool) {
    let user = seed_user(&pool, "1234567").await;
    let room = seed_room(&pool, "Sala 101", 6).await;
    let d = date(2026, 8, 10);

    let row = written(
        ReservationRepo::create_checked(&pool, &booking(&user, &room, d, (10, 0), (11, 0)))
            .await
            .unwrap(),
    );

    // Editing the row itself does not trip the daily rule.
    assert!(ReservationRepo::find_on_date(&pool, user.id, d, Some(row.id))
        .await
        .unwrap()
        .is_none());
    assert!(ReservationRepo::find_on_date(&pool, user.id, d, None)
        .await
        .unwrap()
        .is_some());

    ReservationRepo::cancel(&pool, row.id).await.unwrap().unwrap();
    assert!(ReservationRepo::find_on_date(&pool, user.id, d, None)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn history_pages_newest_first(pool: PgPool) {
    let user = seed_user(&pool, "1234567").await;
    let room = seed_room(&pool, "Sala 101", 6).await;

    for day in 1..=4 {
        let row = written(
            ReservationRepo::create_checked(
                &pool,
                &booking(&user, &room, date(2026, 8, day), (10, 0), (11, 0)),
            )
            .await
            .unwrap(),
        );
        ReservationRepo::cancel(&pool, row.id).await.unwrap().unwrap();
    }

    let total = ReservationRepo::history_count(&pool, Some(user.id)).await.unwrap();
    assert_eq!(total, 4);

    let first_page = ReservationRepo::history(&pool, Some(user.id), 3, 0).await.unwrap();
    assert_eq!(first_page.len(), 3);
    assert_eq!(first_page[0].date, date(2026, 8, 4));
    assert_eq!(first_page[0].room_name, "Sala 101");

    let second_page = ReservationRepo::history(&pool, Some(user.id), 3, 3).await.unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].date, date(2026, 8, 1));
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn available_rooms_filter_by_slot_and_capacity(pool: PgPool) {
    let user = seed_user(&pool, "1234567").await;
    let _small = seed_room(&pool, "Sala 301", 1).await;
    let medium = seed_room(&pool, "Sala 101", 6).await;
    let _large = seed_room(&pool, "Sala 201", 10).await;
    let d = date(2026, 8, 10);

    written(
        ReservationRepo::create_checked(&pool, &booking(&user, &medium, d, (10, 0), (11, 0)))
            .await
            .unwrap(),
    );

    let free = RoomRepo::find_available(&pool, d, time(10, 0), time(11, 0), 2)
        .await
        .unwrap();
    let names: Vec<&str> = free.iter().map(|r| r.name.as_str()).collect();
    // The occupied medium room and the too-small room are both out.
    assert_eq!(names, vec!["Sala 201"]);

    // A back-to-back slot frees the medium room again, smallest first.
    let free = RoomRepo::find_available(&pool, d, time(11, 0), time(12, 0), 2)
        .await
        .unwrap();
    let names: Vec<&str> = free.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Sala 101", "Sala 201"]);
}
