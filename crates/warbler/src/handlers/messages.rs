//! Message handlers and the home timeline.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Form, Json,
};
use uuid::Uuid;

use warbler_auth::CurrentUser;
use warbler_core::social::{timeline_authors, validate_message_text, CreateMessageRequest, Message};
use warbler_core::storage::RepositoryError;

use crate::{
    handlers::{error::ApiError, AppError},
    state::AppState,
};

fn message_not_found(id: Uuid) -> RepositoryError {
    RepositoryError::NotFound {
        entity_type: "Message",
        id: id.to_string(),
    }
}

/// Post a new message (POST /api/messages).
pub async fn create_message(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Form(payload): Form<CreateMessageRequest>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    validate_message_text(&payload.text)?;

    let message = Message::new(user.id, payload.text);
    state.messages.create_message(&message).await?;

    tracing::info!(message_id = %message.id, user_id = %user.id, "Created new message");

    Ok((StatusCode::CREATED, Json(message)))
}

/// Get a single message by ID (GET /api/messages/{id}).
pub async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, AppError> {
    state
        .messages
        .get_message(id)
        .await?
        .map(Json)
        .ok_or_else(|| message_not_found(id).into())
}

/// Delete a message (DELETE /api/messages/{id}). Only its author may do so.
pub async fn delete_message(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let message = state
        .messages
        .get_message(id)
        .await?
        .ok_or_else(|| message_not_found(id))?;

    if message.user_id != user.id {
        tracing::warn!(message_id = %id, user_id = %user.id, "Refused to delete another user's message");
        return Err(ApiError::Forbidden.into());
    }

    state.messages.delete_message(id).await?;

    tracing::info!(message_id = %id, "Deleted message");

    Ok(StatusCode::NO_CONTENT)
}

/// Newest messages by the current user and everyone they follow (GET /api/timeline).
pub async fn timeline(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Message>>, AppError> {
    let following = state.follows.get_following(user.id).await?;
    let authors = timeline_authors(&user, &following);

    let messages = state
        .messages
        .get_timeline(&authors, state.timeline_limit)
        .await?;

    Ok(Json(messages))
}
