//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use warbler_core::social::{
    sort_messages_newest_first, username_matches, Follow, Message, NewUser, User,
    MAX_MESSAGE_LENGTH,
};
use warbler_core::storage::{
    FollowRepository, MessageRepository, RepositoryError, Result, UserRepository,
};

/// In-memory storage backend.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the repository is dropped.
/// Locks are always taken in the order users, messages, follows.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    messages: Arc<RwLock<HashMap<Uuid, Message>>>,
    follows: Arc<RwLock<HashMap<(Uuid, Uuid), Follow>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Fails with `AlreadyExists` if another user already holds `username` or `email`.
fn check_unique(users: &HashMap<Uuid, User>, id: Uuid, username: &str, email: &str) -> Result<()> {
    for other in users.values().filter(|u| u.id != id) {
        if other.username == username {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: username.to_string(),
            });
        }
        if other.email == email {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: email.to_string(),
            });
        }
    }
    Ok(())
}

fn missing_user(id: Uuid) -> RepositoryError {
    RepositoryError::InvalidData(format!("Foreign key constraint violation: no user {id}"))
}

fn sorted_by_username(mut users: Vec<User>) -> Vec<User> {
    users.sort_by(|a, b| a.username.cmp(&b.username));
    users
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self, search: Option<&str>) -> Result<Vec<User>> {
        let users = self.users.read().await;
        let matching = users
            .values()
            .filter(|u| search.is_none_or(|search| username_matches(&u.username, search)))
            .cloned()
            .collect();
        Ok(sorted_by_username(matching))
    }

    async fn create_user(&self, new_user: &NewUser) -> Result<User> {
        let user = new_user
            .clone()
            .into_user()
            .ok_or_else(|| RepositoryError::ConstraintViolation {
                entity_type: "User",
                constraint: if new_user.username.is_none() {
                    "NOT NULL users.username".to_string()
                } else {
                    "NOT NULL users.email".to_string()
                },
            })?;

        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: user.id.to_string(),
            });
        }
        check_unique(&users, user.id, &user.username, &user.email)?;

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(RepositoryError::NotFound {
                entity_type: "User",
                id: user.id.to_string(),
            });
        }
        check_unique(&users, user.id, &user.username, &user.email)?;

        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        let mut users = self.users.write().await;
        let mut messages = self.messages.write().await;
        let mut follows = self.follows.write().await;

        if users.remove(&id).is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: "User",
                id: id.to_string(),
            });
        }
        messages.retain(|_, m| m.user_id != id);
        follows.retain(|(follower, followed), _| *follower != id && *followed != id);
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for InMemoryRepository {
    async fn get_message(&self, id: Uuid) -> Result<Option<Message>> {
        let messages = self.messages.read().await;
        Ok(messages.get(&id).cloned())
    }

    async fn create_message(&self, message: &Message) -> Result<()> {
        let users = self.users.read().await;
        let mut messages = self.messages.write().await;

        if !users.contains_key(&message.user_id) {
            return Err(missing_user(message.user_id));
        }
        if message.text.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(RepositoryError::ConstraintViolation {
                entity_type: "Message",
                constraint: "CHECK length(text) <= 140".to_string(),
            });
        }
        if messages.contains_key(&message.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Message",
                id: message.id.to_string(),
            });
        }
        messages.insert(message.id, message.clone());
        Ok(())
    }

    async fn delete_message(&self, id: Uuid) -> Result<()> {
        let mut messages = self.messages.write().await;
        if messages.remove(&id).is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: "Message",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn get_messages_for_user(&self, user_id: Uuid) -> Result<Vec<Message>> {
        let messages = self.messages.read().await;
        let mut result: Vec<Message> = messages
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        sort_messages_newest_first(&mut result);
        Ok(result)
    }

    async fn get_timeline(&self, author_ids: &[Uuid], limit: usize) -> Result<Vec<Message>> {
        let messages = self.messages.read().await;
        let mut result: Vec<Message> = messages
            .values()
            .filter(|m| author_ids.contains(&m.user_id))
            .cloned()
            .collect();
        sort_messages_newest_first(&mut result);
        result.truncate(limit);
        Ok(result)
    }
}

#[async_trait]
impl FollowRepository for InMemoryRepository {
    async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<()> {
        let users = self.users.read().await;
        let mut follows = self.follows.write().await;

        for id in [follower_id, followed_id] {
            if !users.contains_key(&id) {
                return Err(missing_user(id));
            }
        }
        follows
            .entry((follower_id, followed_id))
            .or_insert_with(|| Follow::new(follower_id, followed_id));
        Ok(())
    }

    async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<()> {
        let mut follows = self.follows.write().await;
        if follows.remove(&(follower_id, followed_id)).is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: "Follow",
                id: format!("{follower_id}:{followed_id}"),
            });
        }
        Ok(())
    }

    async fn is_following(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool> {
        let follows = self.follows.read().await;
        Ok(follows.contains_key(&(follower_id, followed_id)))
    }

    async fn get_following(&self, user_id: Uuid) -> Result<Vec<User>> {
        let users = self.users.read().await;
        let follows = self.follows.read().await;
        let following = follows
            .keys()
            .filter(|(follower, _)| *follower == user_id)
            .filter_map(|(_, followed)| users.get(followed).cloned())
            .collect();
        Ok(sorted_by_username(following))
    }

    async fn get_followers(&self, user_id: Uuid) -> Result<Vec<User>> {
        let users = self.users.read().await;
        let follows = self.follows.read().await;
        let followers = follows
            .keys()
            .filter(|(_, followed)| *followed == user_id)
            .filter_map(|(follower, _)| users.get(follower).cloned())
            .collect();
        Ok(sorted_by_username(followers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use warbler_core::storage::load_profile;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            id: Uuid::new_v4(),
            username: Some(username.to_string()),
            email: Some(format!("{username}@test.com")),
            password: "HASHED_PASSWORD".to_string(),
            image_url: None,
        }
    }

    async fn create(repo: &InMemoryRepository, username: &str) -> User {
        repo.create_user(&new_user(username)).await.unwrap()
    }

    // ==================== User Tests ====================

    #[tokio::test]
    async fn test_user_create_and_get() {
        let repo = InMemoryRepository::new();
        let user = create(&repo, "test1").await;

        assert_eq!(repo.get_user(user.id).await.unwrap(), Some(user.clone()));
        assert_eq!(
            repo.get_user_by_username("test1").await.unwrap(),
            Some(user.clone())
        );
        assert_eq!(
            repo.get_user_by_email("test1@test.com").await.unwrap(),
            Some(user)
        );
    }

    #[tokio::test]
    async fn test_user_missing_username_violates_not_null() {
        let repo = InMemoryRepository::new();
        let mut record = new_user("test1");
        record.username = None;

        let err = repo.create_user(&record).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ConstraintViolation { .. }));
        assert!(err.is_integrity_violation());
        assert!(repo.list_users(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_user_duplicate_email_already_exists() {
        let repo = InMemoryRepository::new();
        create(&repo, "test1").await;

        let mut record = new_user("test2");
        record.email = Some("test1@test.com".to_string());

        let err = repo.create_user(&record).await.unwrap_err();
        assert!(matches!(err, RepositoryError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_user_list_and_search() {
        let repo = InMemoryRepository::new();
        create(&repo, "zed").await;
        create(&repo, "Alice").await;
        create(&repo, "malicious").await;

        let all = repo.list_users(None).await.unwrap();
        let names: Vec<_> = all.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["Alice", "malicious", "zed"]);

        let found = repo.list_users(Some("ALI")).await.unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_user_search_folds_non_ascii_case() {
        let repo = InMemoryRepository::new();
        create(&repo, "Émilie").await;
        create(&repo, "emil").await;

        let found = repo.list_users(Some("émi")).await.unwrap();
        let names: Vec<_> = found.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["Émilie"]);
    }

    #[tokio::test]
    async fn test_user_update_rejects_taken_username() {
        let repo = InMemoryRepository::new();
        create(&repo, "test1").await;
        let mut user2 = create(&repo, "test2").await;

        user2.username = "test1".to_string();
        let result = repo.update_user(&user2).await;
        assert!(matches!(result, Err(RepositoryError::AlreadyExists { .. })));

        user2.username = "test3".to_string();
        user2.bio = Some("hello".to_string());
        repo.update_user(&user2).await.unwrap();
        let stored = repo.get_user(user2.id).await.unwrap().unwrap();
        assert_eq!(stored.username, "test3");
        assert_eq!(stored.bio.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_user_delete_cascades() {
        let repo = InMemoryRepository::new();
        let u1 = create(&repo, "test1").await;
        let u2 = create(&repo, "test2").await;

        repo.create_message(&Message::new(u1.id, "hi")).await.unwrap();
        repo.follow(u1.id, u2.id).await.unwrap();
        repo.follow(u2.id, u1.id).await.unwrap();

        repo.delete_user(u1.id).await.unwrap();

        assert!(repo.get_user(u1.id).await.unwrap().is_none());
        assert!(repo.get_messages_for_user(u1.id).await.unwrap().is_empty());
        assert!(repo.get_followers(u2.id).await.unwrap().is_empty());
        assert!(repo.get_following(u2.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_user_delete_nonexistent() {
        let repo = InMemoryRepository::new();
        let result = repo.delete_user(Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    // ==================== Message Tests ====================

    #[tokio::test]
    async fn test_message_requires_existing_author() {
        let repo = InMemoryRepository::new();
        let result = repo.create_message(&Message::new(Uuid::new_v4(), "hi")).await;
        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_message_too_long_violates_check() {
        let repo = InMemoryRepository::new();
        let user = create(&repo, "test1").await;

        let result = repo
            .create_message(&Message::new(user.id, "x".repeat(MAX_MESSAGE_LENGTH + 1)))
            .await;
        assert!(matches!(
            result,
            Err(RepositoryError::ConstraintViolation { .. })
        ));

        let result = repo
            .create_message(&Message::new(user.id, "é".repeat(MAX_MESSAGE_LENGTH)))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_timeline_is_newest_first_and_limited() {
        let repo = InMemoryRepository::new();
        let u1 = create(&repo, "test1").await;
        let u2 = create(&repo, "test2").await;
        let u3 = create(&repo, "test3").await;
        let now = Utc::now();

        for (i, author) in [u1.id, u2.id, u3.id, u1.id].iter().enumerate() {
            let message = Message::new(*author, format!("message {i}"))
                .with_timestamp(now + Duration::seconds(i as i64));
            repo.create_message(&message).await.unwrap();
        }

        let timeline = repo.get_timeline(&[u1.id, u2.id], 10).await.unwrap();
        let texts: Vec<_> = timeline.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["message 3", "message 1", "message 0"]);

        let limited = repo.get_timeline(&[u1.id, u2.id], 2).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].text, "message 3");
    }

    #[tokio::test]
    async fn test_message_delete() {
        let repo = InMemoryRepository::new();
        let u1 = create(&repo, "test1").await;
        let message = Message::new(u1.id, "hi");
        repo.create_message(&message).await.unwrap();

        repo.delete_message(message.id).await.unwrap();
        assert!(repo.get_message(message.id).await.unwrap().is_none());

        let result = repo.delete_message(message.id).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    // ==================== Follow Tests ====================

    #[tokio::test]
    async fn test_fresh_user_has_no_messages_or_followers() {
        let repo = InMemoryRepository::new();
        let user = create(&repo, "test1").await;

        let profile = load_profile(&repo, &repo, &repo, user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.message_count(), 0);
        assert_eq!(profile.follower_count(), 0);
    }

    #[tokio::test]
    async fn test_follow_is_directed() {
        let repo = InMemoryRepository::new();
        let u1 = create(&repo, "test1").await;
        let u2 = create(&repo, "test2").await;

        repo.follow(u1.id, u2.id).await.unwrap();

        let p1 = load_profile(&repo, &repo, &repo, u1.id).await.unwrap().unwrap();
        let p2 = load_profile(&repo, &repo, &repo, u2.id).await.unwrap().unwrap();

        assert!(p1.is_following(&u2));
        assert!(!p2.is_following(&u1));
        assert!(p2.is_followed_by(&u1));
        assert!(!p1.is_followed_by(&u2));
    }

    #[tokio::test]
    async fn test_follow_is_idempotent() {
        let repo = InMemoryRepository::new();
        let u1 = create(&repo, "test1").await;
        let u2 = create(&repo, "test2").await;

        repo.follow(u1.id, u2.id).await.unwrap();
        repo.follow(u1.id, u2.id).await.unwrap();

        assert_eq!(repo.get_followers(u2.id).await.unwrap().len(), 1);
        assert!(repo.is_following(u1.id, u2.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_follow_unknown_user() {
        let repo = InMemoryRepository::new();
        let u1 = create(&repo, "test1").await;

        let result = repo.follow(u1.id, Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_unfollow() {
        let repo = InMemoryRepository::new();
        let u1 = create(&repo, "test1").await;
        let u2 = create(&repo, "test2").await;

        let result = repo.unfollow(u1.id, u2.id).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));

        repo.follow(u1.id, u2.id).await.unwrap();
        repo.unfollow(u1.id, u2.id).await.unwrap();
        assert!(!repo.is_following(u1.id, u2.id).await.unwrap());
    }
}
