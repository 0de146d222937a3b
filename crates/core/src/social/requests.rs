//! Request types for account, profile and message operations.
//!
//! Pure data types with no I/O. The web layer deserializes these directly from
//! urlencoded forms.

use serde::{Deserialize, Serialize};

use super::types::User;

/// Request payload for creating an account.
///
/// `username` and `email` may be absent; storage rejects the insert if they are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl SignupRequest {
    pub fn new(
        username: Option<&str>,
        email: Option<&str>,
        password: impl Into<String>,
        image_url: Option<&str>,
    ) -> Self {
        Self {
            username: username.map(str::to_string),
            email: email.map(str::to_string),
            password: password.into(),
            image_url: image_url.map(str::to_string),
        }
    }

    /// Returns the request with surrounding whitespace stripped from the
    /// username and email, so validation and storage see the same values.
    pub fn normalized(mut self) -> Self {
        self.username = self.username.map(|u| u.trim().to_string());
        self.email = self.email.map(|e| e.trim().to_string());
        self
    }

    /// Image URL with blank values treated as unset.
    pub fn image_url(&self) -> Option<String> {
        non_blank(self.image_url.as_deref())
    }
}

/// Request payload for logging in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request payload for posting a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMessageRequest {
    pub text: String,
}

/// Request payload for editing the current user's profile.
///
/// `password` is the user's current password and is required to confirm the
/// edit. It is never changed by this request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub password: String,
}

impl UpdateProfileRequest {
    /// Apply the provided fields to a user.
    ///
    /// Blank username/email are ignored. Blank optional fields clear the value,
    /// so the defaults show again.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(username) = non_blank(self.username.as_deref()) {
            user.username = username;
        }
        if let Some(email) = non_blank(self.email.as_deref()) {
            user.email = email;
        }
        if let Some(image_url) = &self.image_url {
            user.image_url = non_blank(Some(image_url));
        }
        if let Some(header_image_url) = &self.header_image_url {
            user.header_image_url = non_blank(Some(header_image_url));
        }
        if let Some(bio) = &self.bio {
            user.bio = non_blank(Some(bio));
        }
        if let Some(location) = &self.location {
            user.location = non_blank(Some(location));
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "test1".to_string(),
            email: "test1@test.com".to_string(),
            password: "hash".to_string(),
            image_url: Some("http://img/old.png".to_string()),
            header_image_url: None,
            bio: None,
            location: None,
        }
    }

    #[test]
    fn test_signup_request_blank_image_is_unset() {
        let req = SignupRequest::new(Some("a"), Some("a@b.com"), "password", Some("  "));
        assert_eq!(req.image_url(), None);

        let req = SignupRequest::new(Some("a"), Some("a@b.com"), "password", Some("http://x"));
        assert_eq!(req.image_url(), Some("http://x".to_string()));
    }

    #[test]
    fn test_signup_request_normalized_trims_username_and_email() {
        let req = SignupRequest::new(Some(" test1 "), Some("\ttest1@test.com "), "password", None)
            .normalized();
        assert_eq!(req.username.as_deref(), Some("test1"));
        assert_eq!(req.email.as_deref(), Some("test1@test.com"));

        let req = SignupRequest::new(None, None, "password", None).normalized();
        assert!(req.username.is_none());
        assert!(req.email.is_none());
    }

    #[test]
    fn test_update_profile_applies_fields() {
        let mut user = test_user();
        let req = UpdateProfileRequest {
            username: Some("renamed".to_string()),
            bio: Some("Hello there".to_string()),
            location: Some("Lisbon".to_string()),
            password: "password".to_string(),
            ..Default::default()
        };

        req.apply_to(&mut user);

        assert_eq!(user.username, "renamed");
        assert_eq!(user.email, "test1@test.com");
        assert_eq!(user.bio.as_deref(), Some("Hello there"));
        assert_eq!(user.location.as_deref(), Some("Lisbon"));
        assert_eq!(user.password, "hash");
    }

    #[test]
    fn test_update_profile_blank_username_is_ignored() {
        let mut user = test_user();
        let req = UpdateProfileRequest {
            username: Some("".to_string()),
            ..Default::default()
        };

        req.apply_to(&mut user);

        assert_eq!(user.username, "test1");
    }

    #[test]
    fn test_update_profile_blank_image_clears_value() {
        let mut user = test_user();
        let req = UpdateProfileRequest {
            image_url: Some("".to_string()),
            ..Default::default()
        };

        req.apply_to(&mut user);

        assert_eq!(user.image_url, None);
    }

    #[test]
    fn test_signup_request_from_form_without_username() {
        let req: SignupRequest =
            serde_json::from_str(r#"{"email":"x@y.com","password":"secret1"}"#).unwrap();
        assert!(req.username.is_none());
        assert_eq!(req.email.as_deref(), Some("x@y.com"));
    }
}
