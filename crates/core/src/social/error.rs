use thiserror::Error;

/// Errors that can occur when validating a message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageError {
    #[error("Message text cannot be empty")]
    EmptyText,
    #[error("Message text too long (max 140 characters)")]
    TextTooLong,
}

/// Errors raised by the signup form before anything reaches storage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignupFormError {
    #[error("Username is required")]
    MissingUsername,
    #[error("Username cannot start or end with whitespace")]
    UsernameWhitespace,
    #[error("Username too long (max 20 characters)")]
    UsernameTooLong,
    #[error("Email is required")]
    MissingEmail,
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
}
