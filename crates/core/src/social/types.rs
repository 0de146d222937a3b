use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Profile image shown when a user has not set one.
pub const DEFAULT_IMAGE_URL: &str = "/static/images/default-pic.png";

/// Header image shown when a user has not set one.
pub const DEFAULT_HEADER_IMAGE_URL: &str = "/static/images/warbler-hero.jpg";

/// Maximum length of a message, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 140;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string. Never serialized.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub image_url: Option<String>,
    pub header_image_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}

impl User {
    /// Returns the profile image, falling back to the default picture.
    pub fn image_url_or_default(&self) -> &str {
        self.image_url.as_deref().unwrap_or(DEFAULT_IMAGE_URL)
    }

    /// Returns the header image, falling back to the default hero image.
    pub fn header_image_url_or_default(&self) -> &str {
        self.header_image_url
            .as_deref()
            .unwrap_or(DEFAULT_HEADER_IMAGE_URL)
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<User #{}: {}, {}>", self.id, self.username, self.email)
    }
}

/// Insert record for a user.
///
/// `username` and `email` are optional here on purpose: the storage layer owns
/// the NOT NULL constraint and reports a missing value as a constraint
/// violation on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: Uuid,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
    pub image_url: Option<String>,
}

impl NewUser {
    /// Converts into a persisted `User` once both required fields are present.
    pub fn into_user(self) -> Option<User> {
        Some(User {
            id: self.id,
            username: self.username?,
            email: self.email?,
            password: self.password,
            image_url: self.image_url,
            header_image_url: None,
            bio: None,
            location: None,
        })
    }
}

/// A short message posted by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// The user who posted this message.
    pub user_id: Uuid,
}

impl Message {
    /// Creates a new message timestamped now.
    pub fn new(user_id: Uuid, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            timestamp: Utc::now(),
            user_id,
        }
    }

    /// Sets a specific timestamp (useful for testing).
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// A directed follow edge: `follower_id` follows `followed_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub follower_id: Uuid,
    pub followed_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Follow {
    pub fn new(follower_id: Uuid, followed_id: Uuid) -> Self {
        Self {
            follower_id,
            followed_id,
            created_at: Utc::now(),
        }
    }
}

/// A user together with their loaded messages and follow collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub user: User,
    pub messages: Vec<Message>,
    pub following: Vec<User>,
    pub followers: Vec<User>,
}

impl UserProfile {
    /// Creates a profile with no messages and no follow edges.
    pub fn new(user: User) -> Self {
        Self {
            user,
            messages: Vec::new(),
            following: Vec::new(),
            followers: Vec::new(),
        }
    }

    /// Is this user following `other`?
    pub fn is_following(&self, other: &User) -> bool {
        self.following.iter().any(|u| u.id == other.id)
    }

    /// Is this user followed by `other`?
    pub fn is_followed_by(&self, other: &User) -> bool {
        self.followers.iter().any(|u| u.id == other.id)
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn following_count(&self) -> usize {
        self.following.len()
    }

    pub fn follower_count(&self) -> usize {
        self.followers.len()
    }
}

/// Counts shown alongside a user on their profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    #[serde(flatten)]
    pub user: User,
    pub image_url_or_default: String,
    pub header_image_url_or_default: String,
    pub messages: usize,
    pub following: usize,
    pub followers: usize,
}

impl From<&UserProfile> for ProfileSummary {
    fn from(profile: &UserProfile) -> Self {
        Self {
            user: profile.user.clone(),
            image_url_or_default: profile.user.image_url_or_default().to_string(),
            header_image_url_or_default: profile.user.header_image_url_or_default().to_string(),
            messages: profile.message_count(),
            following: profile.following_count(),
            followers: profile.follower_count(),
        }
    }
}
