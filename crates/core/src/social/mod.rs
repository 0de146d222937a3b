mod error;
mod operations;
mod requests;
mod types;

pub use error::{MessageError, SignupFormError};
pub use operations::{
    sort_messages_newest_first, timeline_authors, username_matches, validate_email,
    validate_message_text, validate_signup_form, validate_username, MAX_USERNAME_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use requests::{CreateMessageRequest, LoginRequest, SignupRequest, UpdateProfileRequest};
pub use types::{
    Follow, Message, NewUser, ProfileSummary, User, UserProfile, DEFAULT_HEADER_IMAGE_URL,
    DEFAULT_IMAGE_URL, MAX_MESSAGE_LENGTH,
};
