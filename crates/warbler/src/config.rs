use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file (default: "warbler.db")
    pub database_url: String,
    /// Maximum number of messages on a timeline (default: 100)
    pub timeline_limit: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DATABASE_URL` - SQLite database path (default: "warbler.db")
    /// - `TIMELINE_LIMIT` - Messages shown on a timeline (default: 100)
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "warbler.db".to_string()),
            timeline_limit: env::var("TIMELINE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|limit| *limit > 0)
                .unwrap_or(100),
        }
    }

    /// Overrides the database path, e.g. from the `--database` flag.
    pub fn with_database_url(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = database_url.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
