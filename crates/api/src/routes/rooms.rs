//! Route definitions for rooms.

use axum::routing::get;
use axum::Router;

use crate::handlers::rooms;
use crate::state::AppState;

/// Routes mounted at `/rooms`.
///
/// ```text
/// GET  /             -> list
/// POST /             -> create (admin)
/// GET  /available    -> available
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(rooms::list).post(rooms::create))
        .route("/available", get(rooms::available))
}
