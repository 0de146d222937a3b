//! Assembles a [`UserProfile`] from the repositories.

use uuid::Uuid;

use crate::social::UserProfile;

use super::{FollowRepository, MessageRepository, Result, UserRepository};

/// Loads a user with their messages, followees and followers.
///
/// Returns `None` if the user does not exist.
pub async fn load_profile(
    users: &dyn UserRepository,
    messages: &dyn MessageRepository,
    follows: &dyn FollowRepository,
    user_id: Uuid,
) -> Result<Option<UserProfile>> {
    let Some(user) = users.get_user(user_id).await? else {
        return Ok(None);
    };

    let (messages, following, followers) = tokio::try_join!(
        messages.get_messages_for_user(user_id),
        follows.get_following(user_id),
        follows.get_followers(user_id),
    )?;

    Ok(Some(UserProfile {
        user,
        messages,
        following,
        followers,
    }))
}
