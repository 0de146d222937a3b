use std::time::Duration;

const DEFAULT_SESSION_TTL_DAYS: u64 = 7;
const MAX_SESSION_TTL_DAYS: u64 = 3650;
const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Session and cookie configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub session_ttl: Duration,
    pub cookie_name: String,
    pub cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl: default_ttl(),
            cookie_name: "session".to_string(),
            cookie_secure: true,
        }
    }
}

impl AuthConfig {
    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SESSION_TTL_DAYS`: Session TTL in days, 1 to 3650 (default: 7)
    /// - `COOKIE_SECURE`: Whether to set secure flag on cookies (default: true)
    pub fn from_env() -> Self {
        let session_ttl = std::env::var("SESSION_TTL_DAYS")
            .ok()
            .map(|s| parse_ttl_days(&s))
            .unwrap_or_else(default_ttl);

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(true);

        Self {
            session_ttl,
            cookie_secure,
            ..Self::default()
        }
    }

    /// Session TTL as a chrono duration, for expiry arithmetic.
    pub fn session_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_ttl)
            .unwrap_or_else(|_| chrono::Duration::days(DEFAULT_SESSION_TTL_DAYS as i64))
    }
}

fn default_ttl() -> Duration {
    Duration::from_secs(DEFAULT_SESSION_TTL_DAYS * SECS_PER_DAY)
}

/// Parses a TTL in days. Values that are not a number, zero, above
/// `MAX_SESSION_TTL_DAYS` or too large to count in seconds fall back to the default.
fn parse_ttl_days(value: &str) -> Duration {
    let ttl = value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|n| (1..=MAX_SESSION_TTL_DAYS).contains(n))
        .and_then(|n| n.checked_mul(SECS_PER_DAY))
        .map(Duration::from_secs);

    ttl.unwrap_or_else(|| {
        tracing::warn!(value, "Invalid SESSION_TTL_DAYS, using the default");
        default_ttl()
    })
}
