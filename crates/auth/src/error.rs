use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use warbler_core::social::SignupFormError;
use warbler_core::storage::{repository_error_to_status_code, RepositoryError};

/// Auth errors for the warbler_auth crate.
///
/// This wraps the core `AuthError` and adds the failures of the HTTP layer.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Error from the core auth module (hashing, session storage)
    #[error(transparent)]
    Core(#[from] warbler_core::auth::AuthError),

    /// User storage error
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Signup form failed validation
    #[error(transparent)]
    InvalidForm(#[from] SignupFormError),

    /// Unknown username or wrong password
    #[error("Invalid credentials.")]
    InvalidCredentials,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::Core(_) => {
                tracing::error!("Auth error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AuthError::Repository(RepositoryError::AlreadyExists { .. }) => {
                (StatusCode::CONFLICT, "Username already taken".to_string())
            }
            AuthError::Repository(repo_err) => {
                let status = StatusCode::from_u16(repository_error_to_status_code(repo_err))
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                if status.is_server_error() {
                    tracing::error!("Storage error during auth: {}", self);
                    (status, "Internal server error".to_string())
                } else {
                    (status, self.to_string())
                }
            }
            AuthError::InvalidForm(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                AuthError::InvalidForm(SignupFormError::PasswordTooShort),
                StatusCode::BAD_REQUEST,
            ),
            (
                AuthError::Repository(RepositoryError::AlreadyExists {
                    entity_type: "User",
                    id: "test1".to_string(),
                }),
                StatusCode::CONFLICT,
            ),
            (
                AuthError::Repository(RepositoryError::QueryFailed("boom".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AuthError::Core(warbler_core::auth::AuthError::Storage("locked".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
