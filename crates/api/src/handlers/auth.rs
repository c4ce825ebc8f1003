//! Handlers for the `/auth` resource (register, login).

use std::sync::LazyLock;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use booksala_core::error::CoreError;
use booksala_core::roles::{matricula_len_for_role, ROLE_USER};
use booksala_db::models::user::{CreateUser, UserResponse};
use booksala_db::repositories::UserRepo;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Institutional IDs are digit strings, 7 digits for users and 9 for admins.
static MATRICULA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{7,9}$").expect("matricula regex must compile"));

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(regex(path = *MATRICULA_RE, message = "Matricula must be 7 to 9 digits"))]
    pub matricula: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    pub name: Option<String>,
    pub role: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub matricula: String,
    pub password: String,
}

/// Successful authentication response returned by login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// Create a new account. The matricula length is tied to the role:
/// 7 digits for regular users, 9 for admins.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    // 1. Validate payload shape.
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    // 2. Resolve the role, defaulting to a regular user.
    let role = input.role.as_deref().unwrap_or(ROLE_USER);
    let expected_len = matricula_len_for_role(role).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!("Unknown role: {role}")))
    })?;

    // 3. Enforce the role-specific matricula length.
    if input.matricula.len() != expected_len {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Matricula must be exactly {expected_len} digits for role '{role}'"
        ))));
    }

    // 4. Reject duplicate matriculas up front for a friendlier message.
    if UserRepo::find_by_matricula(&state.pool, &input.matricula)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "Matricula already registered".into(),
        )));
    }

    // 5. Hash the password.
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    // 6. Insert and respond with the safe view.
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            matricula: input.matricula,
            password_hash,
            role: role.to_string(),
            name: input.name,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// POST /api/auth/login
///
/// Authenticate with matricula + password. Returns an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    // 1. Cheap format pre-check; fails with the same message as a wrong
    //    password so the response does not reveal which part was off.
    if !MATRICULA_RE.is_match(&input.matricula) {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid matricula or password".into(),
        )));
    }

    // 2. Find user by matricula.
    let user = UserRepo::find_by_matricula(&state.pool, &input.matricula)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid matricula or password".into(),
            ))
        })?;

    // 3. Verify password.
    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid matricula or password".into(),
        )));
    }

    // 4. Generate the access token.
    let token = generate_access_token(user.id, &user.role, &user.matricula, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let expires_in = state.config.jwt.access_token_expiry_mins * 60;

    // 5. Respond with token + public user info.
    Ok(Json(AuthResponse {
        token,
        expires_in,
        user: UserResponse::from(user),
    }))
}
