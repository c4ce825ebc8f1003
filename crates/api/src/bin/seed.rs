//! Development fixture loader: one admin, one regular user, and the room
//! catalog. Safe to run repeatedly; existing rows are left alone.
//!
//! ```text
//! DATABASE_URL=postgres://... cargo run --bin seed
//! ```

use booksala_api::auth::password::hash_password;
use booksala_core::roles::{ROLE_ADMIN, ROLE_USER};
use booksala_db::models::room::CreateRoom;
use booksala_db::models::user::CreateUser;
use booksala_db::repositories::{RoomRepo, UserRepo};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = booksala_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    booksala_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // --- Users ---
    let users = [
        ("123456789", "adminpass", ROLE_ADMIN, "Ana"),
        ("1234567", "userpass", ROLE_USER, "Juliana"),
    ];

    for (matricula, password, role, name) in users {
        let existing = UserRepo::find_by_matricula(&pool, matricula)
            .await
            .expect("User lookup failed");
        if existing.is_some() {
            tracing::info!(matricula, "User already seeded, skipping");
            continue;
        }

        let password_hash = hash_password(password).expect("Password hashing failed");
        let user = UserRepo::create(
            &pool,
            &CreateUser {
                matricula: matricula.to_string(),
                password_hash,
                role: role.to_string(),
                name: Some(name.to_string()),
            },
        )
        .await
        .expect("User insert failed");
        tracing::info!(user_id = user.id, matricula, role, "Seeded user");
    }

    // --- Rooms ---
    let existing_rooms = RoomRepo::list(&pool).await.expect("Room listing failed");
    if !existing_rooms.is_empty() {
        tracing::info!(count = existing_rooms.len(), "Rooms already seeded, skipping");
        return;
    }

    let rooms = [
        ("Sala 101", 6, "Sala de estudo em grupo"),
        ("Sala 102", 8, "Sala de estudo em grupo"),
        ("Sala 201", 10, "Sala de estudo em grupo"),
        ("Sala 202", 2, "Sala de estudo individual ou dupla"),
        ("Sala 301", 1, "Cabine de estudo individual"),
        ("Sala 302", 2, "Sala de estudo individual ou dupla"),
        ("Sala Rachel de Queiroz", 20, "Auditório para eventos e aulas"),
    ];

    for (name, capacity, description) in rooms {
        let room = RoomRepo::create(
            &pool,
            &CreateRoom {
                name: name.to_string(),
                capacity,
                description: Some(description.to_string()),
            },
        )
        .await
        .expect("Room insert failed");
        tracing::info!(room_id = room.id, name, capacity, "Seeded room");
    }

    tracing::info!("Seed complete");
}
