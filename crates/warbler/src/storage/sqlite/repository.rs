//! SQLite repository implementation.
//!
//! Implements the repository traits from `warbler_core::storage` using SQLite.
//! Every call runs as its own statement on the connection's background
//! thread, so each write is committed (or rejected) before it returns.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::types::Value;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use warbler_core::social::{username_matches, Message, NewUser, User};
use warbler_core::storage::{
    FollowRepository, MessageRepository, RepositoryError, Result, UserRepository,
};

use super::conversions::{format_datetime, row_to_message, row_to_user};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Turns "no rows changed" into `QueryReturnedNoRows`, which maps to `NotFound`.
fn require_changed(rows: usize) -> std::result::Result<(), tokio_rusqlite::Error> {
    if rows == 0 {
        Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
    } else {
        Ok(())
    }
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for users, messages and follows.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    /// Runs a user lookup that returns at most one row.
    async fn query_user(&self, sql: &'static str, param: String) -> Result<Option<User>> {
        let id = param.clone();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
                match stmt.query_row([&param], row_to_user) {
                    Ok(user) => Ok(Some(user)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", id))
    }

    /// Runs a query returning users for a single user id parameter.
    async fn query_users_for(&self, sql: &'static str, user_id: Uuid) -> Result<Vec<User>> {
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&user_id_str], row_to_user)
                    .map_err(wrap_err)?;

                let mut users = Vec::new();
                for row_result in rows {
                    users.push(row_result.map_err(wrap_err)?);
                }
                Ok(users)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", user_id.to_string()))
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        self.query_user(schema::SELECT_USER_BY_ID, id.to_string())
            .await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.query_user(schema::SELECT_USER_BY_USERNAME, username.to_string())
            .await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.query_user(schema::SELECT_USER_BY_EMAIL, email.to_string())
            .await
    }

    async fn list_users(&self, search: Option<&str>) -> Result<Vec<User>> {
        let mut users = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_USERS).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_user).map_err(wrap_err)?;

                let mut users = Vec::new();
                for row_result in rows {
                    users.push(row_result.map_err(wrap_err)?);
                }
                Ok(users)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        // SQLite's lower() only folds ASCII
        if let Some(search) = search {
            users.retain(|u| username_matches(&u.username, search));
        }
        Ok(users)
    }

    async fn create_user(&self, new_user: &NewUser) -> Result<User> {
        let id = new_user.id.to_string();
        let username = new_user.username.clone();
        let email = new_user.email.clone();
        let password = new_user.password.clone();
        let image_url = new_user.image_url.clone();
        let error_id = username.clone().unwrap_or_else(|| id.clone());

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_USER,
                    rusqlite::params![id, username, email, password, image_url],
                )
                .map_err(wrap_err)?;

                let mut stmt = conn.prepare(schema::SELECT_USER_BY_ID).map_err(wrap_err)?;
                let user = stmt.query_row([&id], row_to_user).map_err(wrap_err)?;
                Ok(user)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", error_id))
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let id = user.id.to_string();
        let username = user.username.clone();
        let email = user.email.clone();
        let password = user.password.clone();
        let image_url = user.image_url.clone();
        let header_image_url = user.header_image_url.clone();
        let bio = user.bio.clone();
        let location = user.location.clone();
        let user_id = user.id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_USER,
                        rusqlite::params![
                            id,
                            username,
                            email,
                            password,
                            image_url,
                            header_image_url,
                            bio,
                            location
                        ],
                    )
                    .map_err(wrap_err)?;
                require_changed(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", user_id))
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_USER, [&id_str])
                    .map_err(wrap_err)?;
                require_changed(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", id.to_string()))
    }
}

// ============================================================================
// MessageRepository implementation
// ============================================================================

#[async_trait]
impl MessageRepository for SqliteRepository {
    async fn get_message(&self, id: Uuid) -> Result<Option<Message>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_MESSAGE_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_message) {
                    Ok(message) => Ok(Some(message)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Message", id.to_string()))
    }

    async fn create_message(&self, message: &Message) -> Result<()> {
        let id = message.id.to_string();
        let text = message.text.clone();
        let timestamp = format_datetime(&message.timestamp);
        let user_id = message.user_id.to_string();
        let message_id = message.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_MESSAGE,
                    rusqlite::params![id, text, timestamp, user_id],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Message", message_id))
    }

    async fn delete_message(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_MESSAGE, [&id_str])
                    .map_err(wrap_err)?;
                require_changed(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Message", id.to_string()))
    }

    async fn get_messages_for_user(&self, user_id: Uuid) -> Result<Vec<Message>> {
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_MESSAGES_BY_USER)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&user_id_str], row_to_message)
                    .map_err(wrap_err)?;

                let mut messages = Vec::new();
                for row_result in rows {
                    messages.push(row_result.map_err(wrap_err)?);
                }
                Ok(messages)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn get_timeline(&self, author_ids: &[Uuid], limit: usize) -> Result<Vec<Message>> {
        if author_ids.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let sql = schema::select_timeline(author_ids.len());
        let mut params: Vec<Value> = author_ids
            .iter()
            .map(|id| Value::Text(id.to_string()))
            .collect();
        params.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(params), row_to_message)
                    .map_err(wrap_err)?;

                let mut messages = Vec::new();
                for row_result in rows {
                    messages.push(row_result.map_err(wrap_err)?);
                }
                Ok(messages)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// FollowRepository implementation
// ============================================================================

#[async_trait]
impl FollowRepository for SqliteRepository {
    async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<()> {
        let follower = follower_id.to_string();
        let followed = followed_id.to_string();
        let created_at = format_datetime(&Utc::now());

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_FOLLOW,
                    rusqlite::params![follower, followed, created_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Follow", format!("{follower_id}:{followed_id}")))
    }

    async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<()> {
        let follower = follower_id.to_string();
        let followed = followed_id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_FOLLOW, [&follower, &followed])
                    .map_err(wrap_err)?;
                require_changed(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Follow", format!("{follower_id}:{followed_id}")))
    }

    async fn is_following(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool> {
        let follower = follower_id.to_string();
        let followed = followed_id.to_string();

        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_FOLLOW_EXISTS, [&follower, &followed], |row| {
                    row.get::<_, bool>(0)
                })
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn get_following(&self, user_id: Uuid) -> Result<Vec<User>> {
        self.query_users_for(schema::SELECT_FOLLOWING, user_id).await
    }

    async fn get_followers(&self, user_id: Uuid) -> Result<Vec<User>> {
        self.query_users_for(schema::SELECT_FOLLOWERS, user_id).await
    }
}
