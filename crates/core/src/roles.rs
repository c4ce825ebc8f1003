//! Well-known role name constants.
//!
//! These must match the `role` column values seeded by the `seed` binary.

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

/// Enrollment numbers are digit-only and role-specific in length:
/// regular users carry 7 digits, admins 9.
pub const USER_MATRICULA_LEN: usize = 7;
pub const ADMIN_MATRICULA_LEN: usize = 9;

/// Expected matricula length for a role name, if the role is known.
pub fn matricula_len_for_role(role: &str) -> Option<usize> {
    match role {
        ROLE_USER => Some(USER_MATRICULA_LEN),
        ROLE_ADMIN => Some(ADMIN_MATRICULA_LEN),
        _ => None,
    }
}
