//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O.

/// SQL statement to create all tables.
///
/// `foreign_keys` is a per-connection setting, so it is switched on here
/// together with the schema.
pub const CREATE_TABLES: &str = r#"
PRAGMA foreign_keys = ON;

-- Users table
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    image_url TEXT,
    header_image_url TEXT,
    bio TEXT,
    location TEXT
);

-- Messages table
CREATE TABLE IF NOT EXISTS messages (
    id TEXT PRIMARY KEY,
    text TEXT NOT NULL CHECK (length(text) <= 140),
    timestamp TEXT NOT NULL,
    user_id TEXT NOT NULL,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

-- Follows table (directed edge: follower follows followed)
CREATE TABLE IF NOT EXISTS follows (
    follower_id TEXT NOT NULL,
    followed_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (follower_id, followed_id),
    FOREIGN KEY (follower_id) REFERENCES users(id) ON DELETE CASCADE,
    FOREIGN KEY (followed_id) REFERENCES users(id) ON DELETE CASCADE
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_messages_user_timestamp ON messages(user_id, timestamp);
CREATE INDEX IF NOT EXISTS idx_follows_followed_id ON follows(followed_id);
"#;

// User queries
pub const INSERT_USER: &str = r#"
INSERT INTO users (id, username, email, password, image_url)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_USER_BY_ID: &str = r#"
SELECT id, username, email, password, image_url, header_image_url, bio, location
FROM users
WHERE id = ?1
"#;

pub const SELECT_USER_BY_USERNAME: &str = r#"
SELECT id, username, email, password, image_url, header_image_url, bio, location
FROM users
WHERE username = ?1
"#;

pub const SELECT_USER_BY_EMAIL: &str = r#"
SELECT id, username, email, password, image_url, header_image_url, bio, location
FROM users
WHERE email = ?1
"#;

pub const SELECT_USERS: &str = r#"
SELECT id, username, email, password, image_url, header_image_url, bio, location
FROM users
ORDER BY username ASC
"#;

pub const UPDATE_USER: &str = r#"
UPDATE users
SET username = ?2, email = ?3, password = ?4, image_url = ?5,
    header_image_url = ?6, bio = ?7, location = ?8
WHERE id = ?1
"#;

pub const DELETE_USER: &str = r#"
DELETE FROM users
WHERE id = ?1
"#;

// Message queries
pub const INSERT_MESSAGE: &str = r#"
INSERT INTO messages (id, text, timestamp, user_id)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const SELECT_MESSAGE_BY_ID: &str = r#"
SELECT id, text, timestamp, user_id
FROM messages
WHERE id = ?1
"#;

pub const SELECT_MESSAGES_BY_USER: &str = r#"
SELECT id, text, timestamp, user_id
FROM messages
WHERE user_id = ?1
ORDER BY timestamp DESC
"#;

pub const DELETE_MESSAGE: &str = r#"
DELETE FROM messages
WHERE id = ?1
"#;

/// Builds the timeline query for `author_count` authors.
///
/// Parameters are the author ids followed by the limit.
pub fn select_timeline(author_count: usize) -> String {
    let placeholders = (1..=author_count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT id, text, timestamp, user_id FROM messages \
         WHERE user_id IN ({placeholders}) \
         ORDER BY timestamp DESC \
         LIMIT ?{}",
        author_count + 1
    )
}

// Follow queries
pub const INSERT_FOLLOW: &str = r#"
INSERT INTO follows (follower_id, followed_id, created_at)
VALUES (?1, ?2, ?3)
ON CONFLICT (follower_id, followed_id) DO NOTHING
"#;

pub const DELETE_FOLLOW: &str = r#"
DELETE FROM follows
WHERE follower_id = ?1 AND followed_id = ?2
"#;

pub const SELECT_FOLLOW_EXISTS: &str = r#"
SELECT EXISTS (
    SELECT 1 FROM follows WHERE follower_id = ?1 AND followed_id = ?2
)
"#;

pub const SELECT_FOLLOWING: &str = r#"
SELECT u.id, u.username, u.email, u.password, u.image_url, u.header_image_url, u.bio, u.location
FROM users u
INNER JOIN follows f ON u.id = f.followed_id
WHERE f.follower_id = ?1
ORDER BY u.username ASC
"#;

pub const SELECT_FOLLOWERS: &str = r#"
SELECT u.id, u.username, u.email, u.password, u.image_url, u.header_image_url, u.bio, u.location
FROM users u
INNER JOIN follows f ON u.id = f.follower_id
WHERE f.followed_id = ?1
ORDER BY u.username ASC
"#;
