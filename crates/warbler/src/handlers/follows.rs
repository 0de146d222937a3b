//! Follow and unfollow handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use warbler_auth::CurrentUser;

use super::users::user_not_found;
use crate::{
    handlers::{error::ApiError, AppError},
    state::AppState,
};

/// Follow a user (POST /api/users/{id}/follow).
///
/// Following someone you already follow is a no-op.
pub async fn follow_user(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if id == user.id {
        return Err(ApiError::SelfFollow.into());
    }
    if state.users.get_user(id).await?.is_none() {
        return Err(user_not_found(id).into());
    }

    state.follows.follow(user.id, id).await?;

    tracing::info!(follower_id = %user.id, followed_id = %id, "Followed user");

    Ok(StatusCode::NO_CONTENT)
}

/// Stop following a user (DELETE /api/users/{id}/follow).
pub async fn unfollow_user(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.follows.unfollow(user.id, id).await?;

    tracing::info!(follower_id = %user.id, followed_id = %id, "Unfollowed user");

    Ok(StatusCode::NO_CONTENT)
}
