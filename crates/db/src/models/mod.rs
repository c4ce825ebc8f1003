//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - Where the API patches rows, an update DTO with all-`Option` fields

pub mod reservation;
pub mod room;
pub mod user;

pub use reservation::{CreateReservation, Reservation, ReservationDetail};
pub use room::{CreateRoom, Room};
pub use user::{CreateUser, User, UserResponse};
