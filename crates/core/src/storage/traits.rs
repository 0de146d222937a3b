use async_trait::async_trait;
use uuid::Uuid;

use crate::social::{Message, NewUser, User};

use super::Result;

/// Repository for user operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by their ID.
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Gets a user by their username (exact match).
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Gets a user by their email address.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Lists users ordered by username.
    ///
    /// With `search`, only users whose username contains it (case-insensitive).
    async fn list_users(&self, search: Option<&str>) -> Result<Vec<User>>;

    /// Inserts a new user and returns the stored row.
    ///
    /// Fails with `ConstraintViolation` when username or email is missing and
    /// with `AlreadyExists` when either is taken.
    async fn create_user(&self, user: &NewUser) -> Result<User>;

    /// Updates an existing user.
    async fn update_user(&self, user: &User) -> Result<()>;

    /// Deletes a user along with their messages and follow edges.
    async fn delete_user(&self, id: Uuid) -> Result<()>;
}

/// Repository for message operations.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Gets a message by its ID.
    async fn get_message(&self, id: Uuid) -> Result<Option<Message>>;

    /// Creates a new message. The author must exist.
    async fn create_message(&self, message: &Message) -> Result<()>;

    /// Deletes a message by its ID.
    async fn delete_message(&self, id: Uuid) -> Result<()>;

    /// Gets all messages by a user, newest first.
    async fn get_messages_for_user(&self, user_id: Uuid) -> Result<Vec<Message>>;

    /// Gets the newest `limit` messages written by any of `author_ids`.
    async fn get_timeline(&self, author_ids: &[Uuid], limit: usize) -> Result<Vec<Message>>;
}

/// Repository for the follower/followee relationship.
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Records that `follower_id` follows `followed_id`. Following twice is a no-op.
    async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<()>;

    /// Removes the edge. Fails with `NotFound` if it does not exist.
    async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<()>;

    /// Checks whether the edge exists.
    async fn is_following(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool>;

    /// Users that `user_id` follows, ordered by username.
    async fn get_following(&self, user_id: Uuid) -> Result<Vec<User>>;

    /// Users following `user_id`, ordered by username.
    async fn get_followers(&self, user_id: Uuid) -> Result<Vec<User>>;
}
