use uuid::Uuid;

use super::error::{MessageError, SignupFormError};
use super::requests::SignupRequest;
use super::types::{Message, User, MAX_MESSAGE_LENGTH};

/// Maximum username length accepted by the signup form.
pub const MAX_USERNAME_LENGTH: usize = 20;

/// Minimum password length accepted by the signup form.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Validates message text before it is posted.
///
/// Length is counted in characters, not bytes.
pub fn validate_message_text(text: &str) -> Result<(), MessageError> {
    if text.trim().is_empty() {
        return Err(MessageError::EmptyText);
    }
    if text.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(MessageError::TextTooLong);
    }
    Ok(())
}

/// Validates a signup form submitted over HTTP.
///
/// This is a form-level check. The `signup` operation itself does not call it
/// and relies on storage constraints instead. Pass a
/// [`SignupRequest::normalized`] request so the checked values are the stored ones.
pub fn validate_signup_form(request: &SignupRequest) -> Result<(), SignupFormError> {
    validate_username(request.username.as_deref().unwrap_or_default())?;
    validate_email(request.email.as_deref().unwrap_or_default())?;

    if request.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(SignupFormError::PasswordTooShort);
    }

    Ok(())
}

/// Checks a username as it will be stored. It must be non-blank and already
/// trimmed, and at most [`MAX_USERNAME_LENGTH`] characters long.
pub fn validate_username(username: &str) -> Result<(), SignupFormError> {
    if username.trim().is_empty() {
        return Err(SignupFormError::MissingUsername);
    }
    if username.trim() != username {
        return Err(SignupFormError::UsernameWhitespace);
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(SignupFormError::UsernameTooLong);
    }
    Ok(())
}

/// Checks an email address as it will be stored. It needs one `@` with
/// something on both sides and no whitespace.
pub fn validate_email(email: &str) -> Result<(), SignupFormError> {
    if email.trim().is_empty() {
        return Err(SignupFormError::MissingEmail);
    }
    if !is_valid_email(email) {
        return Err(SignupFormError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

/// Case-insensitive substring match used by user search.
///
/// Folding happens here rather than in SQL so every backend agrees on
/// non-ASCII names.
pub fn username_matches(username: &str, search: &str) -> bool {
    username.to_lowercase().contains(&search.to_lowercase())
}

/// Returns the ids whose messages belong on a user's timeline: the user
/// first, then everyone they follow, without duplicates.
pub fn timeline_authors(user: &User, following: &[User]) -> Vec<Uuid> {
    let mut ids = Vec::with_capacity(following.len() + 1);
    ids.push(user.id);
    for followed in following {
        if !ids.contains(&followed.id) {
            ids.push(followed.id);
        }
    }
    ids
}

/// Sorts messages newest first. Ties keep their relative order.
pub fn sort_messages_newest_first(messages: &mut [Message]) {
    messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Checks for a single `@` with something on both sides.
fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn user(username: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password: "hash".to_string(),
            image_url: None,
            header_image_url: None,
            bio: None,
            location: None,
        }
    }

    #[test]
    fn test_validate_message_text_valid() {
        assert!(validate_message_text("Hello, warbler!").is_ok());
    }

    #[test]
    fn test_validate_message_text_empty() {
        assert_eq!(validate_message_text(""), Err(MessageError::EmptyText));
        assert_eq!(validate_message_text("   "), Err(MessageError::EmptyText));
    }

    #[test]
    fn test_validate_message_text_length_boundary() {
        let max = "a".repeat(MAX_MESSAGE_LENGTH);
        assert!(validate_message_text(&max).is_ok());

        let too_long = "a".repeat(MAX_MESSAGE_LENGTH + 1);
        assert_eq!(
            validate_message_text(&too_long),
            Err(MessageError::TextTooLong)
        );
    }

    #[test]
    fn test_validate_message_text_counts_chars_not_bytes() {
        let text = "é".repeat(MAX_MESSAGE_LENGTH);
        assert!(validate_message_text(&text).is_ok());
    }

    #[test]
    fn test_validate_signup_form_valid() {
        let req = SignupRequest::new(Some("test1"), Some("test1@test.com"), "password", None);
        assert!(validate_signup_form(&req).is_ok());
    }

    #[test]
    fn test_validate_signup_form_missing_fields() {
        let req = SignupRequest::new(None, Some("test1@test.com"), "password", None);
        assert_eq!(
            validate_signup_form(&req),
            Err(SignupFormError::MissingUsername)
        );

        let req = SignupRequest::new(Some("test1"), Some(" "), "password", None);
        assert_eq!(validate_signup_form(&req), Err(SignupFormError::MissingEmail));
    }

    #[test]
    fn test_validate_signup_form_bad_email() {
        for email in ["no-at-sign", "@test.com", "a@", "a@b@c", "a b@test.com"] {
            let req = SignupRequest::new(Some("test1"), Some(email), "password", None);
            assert!(
                matches!(
                    validate_signup_form(&req),
                    Err(SignupFormError::InvalidEmail(_))
                ),
                "{email} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_signup_form_short_password() {
        let req = SignupRequest::new(Some("test1"), Some("test1@test.com"), "12345", None);
        assert_eq!(
            validate_signup_form(&req),
            Err(SignupFormError::PasswordTooShort)
        );
    }

    #[test]
    fn test_validate_signup_form_long_username() {
        let name = "u".repeat(MAX_USERNAME_LENGTH + 1);
        let req = SignupRequest::new(Some(&name), Some("test1@test.com"), "password", None);
        assert_eq!(
            validate_signup_form(&req),
            Err(SignupFormError::UsernameTooLong)
        );
    }

    #[test]
    fn test_validate_signup_form_rejects_padded_username() {
        let req = SignupRequest::new(Some(" test1 "), Some("test1@test.com"), "password", None);
        assert_eq!(
            validate_signup_form(&req),
            Err(SignupFormError::UsernameWhitespace)
        );

        let req = req.normalized();
        assert_eq!(req.username.as_deref(), Some("test1"));
        assert!(validate_signup_form(&req).is_ok());
    }

    #[test]
    fn test_validate_username_and_email_on_their_own() {
        assert!(validate_username("test1").is_ok());
        assert_eq!(
            validate_username(&"u".repeat(60)),
            Err(SignupFormError::UsernameTooLong)
        );
        assert_eq!(validate_username(""), Err(SignupFormError::MissingUsername));

        assert!(validate_email("test1@test.com").is_ok());
        assert_eq!(
            validate_email("not-an-email"),
            Err(SignupFormError::InvalidEmail("not-an-email".to_string()))
        );
        assert_eq!(validate_email("  "), Err(SignupFormError::MissingEmail));
    }

    #[test]
    fn test_username_matches_folds_unicode() {
        assert!(username_matches("Émilie", "émi"));
        assert!(username_matches("alice", "ALI"));
        assert!(!username_matches("bob", "ali"));
    }

    #[test]
    fn test_timeline_authors_includes_self_first() {
        let me = user("me");
        let a = user("a");
        let b = user("b");

        let ids = timeline_authors(&me, &[a.clone(), b.clone(), a.clone()]);

        assert_eq!(ids, vec![me.id, a.id, b.id]);
    }

    #[test]
    fn test_timeline_authors_self_follow_not_duplicated() {
        let me = user("me");
        let ids = timeline_authors(&me, std::slice::from_ref(&me));
        assert_eq!(ids, vec![me.id]);
    }

    #[test]
    fn test_sort_messages_newest_first() {
        let author = Uuid::new_v4();
        let now = Utc::now();
        let old = Message::new(author, "old").with_timestamp(now - Duration::hours(2));
        let mid = Message::new(author, "mid").with_timestamp(now - Duration::hours(1));
        let new = Message::new(author, "new").with_timestamp(now);

        let mut messages = vec![mid, old, new];
        sort_messages_newest_first(&mut messages);

        let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["new", "mid", "old"]);
    }
}
