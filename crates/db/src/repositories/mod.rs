//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod reservation_repo;
pub mod room_repo;
pub mod user_repo;

pub use reservation_repo::{ReservationRepo, ReservationWrite};
pub use room_repo::RoomRepo;
pub use user_repo::UserRepo;
