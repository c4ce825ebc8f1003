//! Periodic completion sweep for expired reservations.
//!
//! Spawns a background task that flips active reservations whose slot has
//! fully passed to `completed`. Runs on a fixed interval using
//! `tokio::time::interval`; admins can also trigger the same flip manually
//! via `POST /api/reservations/complete-past`.

use std::time::Duration;

use chrono::Local;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use booksala_db::repositories::ReservationRepo;

/// Run the completion sweep loop.
///
/// Flips every active reservation whose date is past, or whose end time on
/// the current date is at or before now, to `completed`. Runs until
/// `cancel` is triggered.
pub async fn run(pool: PgPool, interval_secs: u64, cancel: CancellationToken) {
    tracing::info!(interval_secs, "Completion sweep started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Completion sweep stopping");
                break;
            }
            _ = interval.tick() => {
                let now = Local::now();
                match ReservationRepo::complete_past(&pool, now.date_naive(), now.time()).await {
                    Ok(completed) => {
                        if completed > 0 {
                            tracing::info!(completed, "Completion sweep: flipped expired reservations");
                        } else {
                            tracing::debug!("Completion sweep: nothing to flip");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Completion sweep failed");
                    }
                }
            }
        }
    }
}
