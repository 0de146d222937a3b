//! Handlers for the logged-in user's own profile.

use axum::{extract::State, http::StatusCode, Form, Json};

use warbler_auth::CurrentUser;
use warbler_core::auth::authenticate;
use warbler_core::social::{
    validate_email, validate_username, ProfileSummary, UpdateProfileRequest, User,
};

use super::users::require_profile;
use crate::{
    handlers::{error::ApiError, AppError},
    state::AppState,
};

/// Show the current user's profile (GET /api/profile).
pub async fn get_profile(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<ProfileSummary>, AppError> {
    let profile = require_profile(&state, user.id).await?;
    Ok(Json(ProfileSummary::from(&profile)))
}

/// Edit the current user's profile (PATCH /api/profile).
///
/// The current password must be supplied and is checked before anything changes.
/// The resulting username and email must pass the same checks as signup.
pub async fn update_profile(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Form(payload): Form<UpdateProfileRequest>,
) -> Result<Json<User>, AppError> {
    let mut user = authenticate(state.users.as_ref(), &user.username, &payload.password)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    payload.apply_to(&mut user);
    validate_username(&user.username)?;
    validate_email(&user.email)?;

    state.users.update_user(&user).await?;

    tracing::info!(user_id = %user.id, "Updated profile");

    Ok(Json(user))
}

/// Delete the current user's account (DELETE /api/profile).
///
/// Messages and follow edges go with it, and every session of the user ends.
pub async fn delete_profile(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.users.delete_user(user.id).await?;
    state.auth.sessions.delete_user_sessions(user.id).await?;

    tracing::info!(user_id = %user.id, "Deleted account");

    Ok(StatusCode::NO_CONTENT)
}
