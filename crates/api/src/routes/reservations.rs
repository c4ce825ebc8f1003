//! Route definitions for reservations.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::reservations;
use crate::state::AppState;

/// Routes mounted at `/reservations`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// GET    /history          -> history
/// POST   /complete-past    -> complete_past (admin)
/// PUT    /{id}             -> update
/// DELETE /{id}             -> cancel
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reservations::list).post(reservations::create))
        .route("/history", get(reservations::history))
        .route("/complete-past", post(reservations::complete_past))
        .route(
            "/{id}",
            put(reservations::update).delete(reservations::cancel),
        )
}
