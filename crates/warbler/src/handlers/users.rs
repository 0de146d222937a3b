//! User listing and profile pages.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use warbler_auth::OptionalUser;
use warbler_core::social::{Message, ProfileSummary, User, UserProfile};
use warbler_core::storage::{load_profile, RepositoryError};

use crate::{handlers::AppError, state::AppState};

/// Query parameters for listing users.
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    /// Case-insensitive username search.
    pub q: Option<String>,
}

/// A user's profile page.
#[derive(Debug, Serialize)]
pub struct UserPage {
    #[serde(flatten)]
    pub summary: ProfileSummary,
    /// Whether the logged-in viewer follows this user. Absent for anonymous requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followed_by_viewer: Option<bool>,
}

pub(crate) fn user_not_found(id: Uuid) -> RepositoryError {
    RepositoryError::NotFound {
        entity_type: "User",
        id: id.to_string(),
    }
}

/// Loads the full profile for `id`, or `NotFound`.
pub(crate) async fn require_profile(state: &AppState, id: Uuid) -> Result<UserProfile, AppError> {
    load_profile(
        state.users.as_ref(),
        state.messages.as_ref(),
        state.follows.as_ref(),
        id,
    )
    .await?
    .ok_or_else(|| user_not_found(id).into())
}

async fn require_user(state: &AppState, id: Uuid) -> Result<User, AppError> {
    state
        .users
        .get_user(id)
        .await?
        .ok_or_else(|| user_not_found(id).into())
}

/// List or search users (GET /api/users?q=).
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Vec<User>>, AppError> {
    let search = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let users = state.users.list_users(search).await?;
    Ok(Json(users))
}

/// Show a user's profile summary (GET /api/users/{id}).
pub async fn get_user(
    OptionalUser(viewer): OptionalUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserPage>, AppError> {
    let profile = require_profile(&state, id).await?;

    Ok(Json(UserPage {
        summary: ProfileSummary::from(&profile),
        followed_by_viewer: viewer.map(|viewer| profile.is_followed_by(&viewer)),
    }))
}

/// Users that a user follows (GET /api/users/{id}/following).
pub async fn list_following(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<User>>, AppError> {
    require_user(&state, id).await?;
    Ok(Json(state.follows.get_following(id).await?))
}

/// Users following a user (GET /api/users/{id}/followers).
pub async fn list_followers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<User>>, AppError> {
    require_user(&state, id).await?;
    Ok(Json(state.follows.get_followers(id).await?))
}

/// Messages posted by a user, newest first (GET /api/users/{id}/messages).
pub async fn list_user_messages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Message>>, AppError> {
    require_user(&state, id).await?;
    Ok(Json(state.messages.get_messages_for_user(id).await?))
}
