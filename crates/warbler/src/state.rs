//! Application state with repository-based storage.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. It holds repository trait objects for storage and the
//! auth state used by the `CurrentUser` extractor.

use std::sync::Arc;

use axum::extract::FromRef;

use warbler_auth::{AuthConfig, AuthState};
use warbler_core::auth::SessionRepository;
use warbler_core::storage::{FollowRepository, MessageRepository, UserRepository};

use crate::config::Config;

/// Shared application state.
///
/// This is cloned for each request handler. All repositories usually point
/// at the same backend.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub follows: Arc<dyn FollowRepository>,
    /// Sessions and the user lookup for authentication.
    pub auth: AuthState,
    /// Maximum number of messages returned by the timeline.
    pub timeline_limit: usize,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl AppState {
    /// Creates a new AppState on top of a single storage backend.
    fn build<R>(
        repo: Arc<R>,
        sessions: Arc<dyn SessionRepository>,
        auth_config: AuthConfig,
        config: &Config,
    ) -> Self
    where
        R: UserRepository + MessageRepository + FollowRepository + 'static,
    {
        Self {
            users: repo.clone(),
            messages: repo.clone(),
            follows: repo.clone(),
            auth: AuthState::new(sessions, repo, auth_config),
            timeline_limit: config.timeline_limit,
        }
    }

    /// Creates AppState from configuration, opening the configured backends.
    pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
        let sessions = session_store(config).await?;
        let auth_config = AuthConfig::from_env();

        #[cfg(feature = "sqlite")]
        let repo = {
            tracing::info!(path = %config.database_url, "Opening SQLite database");
            Arc::new(crate::storage::SqliteRepository::new(&config.database_url).await?)
        };

        #[cfg(not(feature = "sqlite"))]
        let repo = {
            tracing::warn!("SQLite disabled, data is kept in memory only");
            Arc::new(crate::storage::InMemoryRepository::new())
        };

        Ok(Self::build(repo, sessions, auth_config, config))
    }
}

/// Opens the session store: SQLite when `auth-sqlite` is enabled, memory otherwise.
#[cfg(feature = "auth-sqlite")]
async fn session_store(config: &Config) -> Result<Arc<dyn SessionRepository>, anyhow::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
    use warbler_auth::SqliteSessionStore;

    let options = SqliteConnectOptions::new()
        .filename(&config.database_url)
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;

    let store = SqliteSessionStore::new(pool);
    store.migrate().await?;

    Ok(Arc::new(store))
}

/// Opens the session store: SQLite when `auth-sqlite` is enabled, memory otherwise.
#[cfg(not(feature = "auth-sqlite"))]
async fn session_store(_config: &Config) -> Result<Arc<dyn SessionRepository>, anyhow::Error> {
    Ok(Arc::new(warbler_auth::InMemorySessionStore::new()))
}

// ============================================================================
// Test support - provides Default implementation for unit tests
// ============================================================================

#[cfg(test)]
impl Default for AppState {
    /// Creates an AppState with in-memory storage and sessions.
    fn default() -> Self {
        let config = Config {
            database_url: ":memory:".to_string(),
            timeline_limit: 100,
        };
        let auth_config = AuthConfig {
            cookie_secure: false,
            ..AuthConfig::default()
        };

        Self::build(
            Arc::new(crate::storage::InMemoryRepository::new()),
            Arc::new(warbler_auth::InMemorySessionStore::new()),
            auth_config,
            &config,
        )
    }
}
