//! Account operations: signup and password authentication.

use uuid::Uuid;

use crate::social::{NewUser, SignupRequest, User};
use crate::storage::{RepositoryError, UserRepository};

use super::{hash_password, verify_password};

/// Creates a user with a hashed password.
///
/// Surrounding whitespace is stripped from the username and email first.
/// The password is hashed before anything is persisted. Missing or duplicate
/// usernames and emails are not checked here; the repository's integrity
/// constraints reject them (see [`RepositoryError::is_integrity_violation`]).
pub async fn signup(
    users: &dyn UserRepository,
    request: SignupRequest,
) -> Result<User, RepositoryError> {
    let request = request.normalized();
    let password = hash_password(&request.password)
        .map_err(|e| RepositoryError::InvalidData(e.to_string()))?;

    let new_user = NewUser {
        id: Uuid::new_v4(),
        image_url: request.image_url(),
        username: request.username,
        email: request.email,
        password,
    };

    let user = users.create_user(&new_user).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "Signed up new user");

    Ok(user)
}

/// Finds a user by username and checks their password.
///
/// Returns `Ok(None)` for an unknown username and for a wrong password alike.
pub async fn authenticate(
    users: &dyn UserRepository,
    username: &str,
    password: &str,
) -> Result<Option<User>, RepositoryError> {
    let Some(user) = users.get_user_by_username(username).await? else {
        tracing::debug!(username, "Authentication failed: unknown user");
        return Ok(None);
    };

    if verify_password(password, &user.password) {
        Ok(Some(user))
    } else {
        tracing::debug!(username, "Authentication failed: wrong password");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::storage::Result;

    /// Enforces the same NOT NULL and UNIQUE rules as the real schema.
    #[derive(Default)]
    struct FakeUsers {
        users: Mutex<Vec<User>>,
    }

    #[async_trait]
    impl UserRepository for FakeUsers {
        async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.id == id).cloned())
        }

        async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.username == username).cloned())
        }

        async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.email == email).cloned())
        }

        async fn list_users(&self, _search: Option<&str>) -> Result<Vec<User>> {
            Ok(self.users.lock().unwrap().clone())
        }

        async fn create_user(&self, new_user: &NewUser) -> Result<User> {
            let user = new_user
                .clone()
                .into_user()
                .ok_or(RepositoryError::ConstraintViolation {
                    entity_type: "User",
                    constraint: "NOT NULL".to_string(),
                })?;
            let mut users = self.users.lock().unwrap();
            if users
                .iter()
                .any(|u| u.username == user.username || u.email == user.email)
            {
                return Err(RepositoryError::AlreadyExists {
                    entity_type: "User",
                    id: user.username,
                });
            }
            users.push(user.clone());
            Ok(user)
        }

        async fn update_user(&self, _user: &User) -> Result<()> {
            Ok(())
        }

        async fn delete_user(&self, _id: Uuid) -> Result<()> {
            Ok(())
        }
    }

    async fn seeded() -> FakeUsers {
        let repo = FakeUsers::default();
        signup(
            &repo,
            SignupRequest::new(Some("test1"), Some("test1@test.com"), "password", None),
        )
        .await
        .unwrap();
        repo
    }

    #[tokio::test]
    async fn signup_hashes_password() {
        let repo = FakeUsers::default();

        let user = signup(
            &repo,
            SignupRequest::new(
                Some("TestingSignup"),
                Some("TestingUserSignup@gmail.com"),
                "password",
                None,
            ),
        )
        .await
        .unwrap();

        assert_ne!(user.password, "password");
        assert!(verify_password("password", &user.password));
        assert!(repo.list_users(None).await.unwrap().contains(&user));
    }

    #[tokio::test]
    async fn signup_without_username_is_integrity_error() {
        let repo = FakeUsers::default();

        let err = signup(
            &repo,
            SignupRequest::new(None, Some("InvalidUser@gmail.com"), "password", None),
        )
        .await
        .unwrap_err();

        assert!(err.is_integrity_violation());
    }

    #[tokio::test]
    async fn signup_duplicate_username_is_integrity_error() {
        let repo = seeded().await;

        let err = signup(
            &repo,
            SignupRequest::new(Some("test1"), Some("other@test.com"), "password", None),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, RepositoryError::AlreadyExists { .. }));
        assert!(err.is_integrity_violation());
    }

    #[tokio::test]
    async fn signup_stores_trimmed_username() {
        let repo = seeded().await;

        let err = signup(
            &repo,
            SignupRequest::new(Some(" test1 "), Some(" other@test.com "), "password", None),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepositoryError::AlreadyExists { .. }));

        let user = signup(
            &repo,
            SignupRequest::new(Some(" test2 "), Some(" test2@test.com "), "password", None),
        )
        .await
        .unwrap();
        assert_eq!(user.username, "test2");
        assert_eq!(user.email, "test2@test.com");
    }

    #[tokio::test]
    async fn authenticate_success() {
        let repo = seeded().await;

        let user = authenticate(&repo, "test1", "password").await.unwrap();

        assert_eq!(user.map(|u| u.username), Some("test1".to_string()));
    }

    #[tokio::test]
    async fn authenticate_unknown_username() {
        let repo = seeded().await;

        let user = authenticate(&repo, "swaggy", "password").await.unwrap();

        assert!(user.is_none());
    }

    #[tokio::test]
    async fn authenticate_wrong_password() {
        let repo = seeded().await;

        let user = authenticate(&repo, "test1", "swaggy").await.unwrap();

        assert!(user.is_none());
    }
}
