pub mod auth;
pub mod health;
pub mod reservations;
pub mod rooms;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                  register (public)
/// /auth/login                     login (public)
///
/// /rooms                          list (auth), create (admin)
/// /rooms/available                bookable rooms for a slot (auth)
///
/// /reservations                   list active (auth), create (auth)
/// /reservations/history           finished reservations, paginated (auth)
/// /reservations/complete-past     manual completion sweep (admin)
/// /reservations/{id}              edit (PUT), cancel (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (register, login).
        .nest("/auth", auth::router())
        // Room catalog and availability.
        .nest("/rooms", rooms::router())
        // Reservation lifecycle.
        .nest("/reservations", reservations::router())
}
