//! User entity model and DTOs.

use booksala_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    /// Enrollment number, digits only. 7 digits for users, 9 for admins.
    pub matricula: String,
    pub password_hash: String,
    pub role: String,
    pub name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub matricula: String,
    pub role: String,
    pub name: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            matricula: user.matricula,
            role: user.role,
            name: user.name,
        }
    }
}

/// DTO for creating a new user. The hash is produced by the API layer;
/// plaintext passwords never reach this crate.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub matricula: String,
    pub password_hash: String,
    pub role: String,
    pub name: Option<String>,
}
