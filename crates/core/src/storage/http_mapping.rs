//! HTTP status codes for repository errors.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// Integrity failures are client errors: a taken username or email is a
/// conflict (409) and a missing required column is unprocessable (422).
/// A message pointing at a user that does not exist is `InvalidData` (400).
/// Database trouble is a 5xx, with 503 when the database cannot be reached.
///
/// ```
/// use warbler_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::AlreadyExists {
///     entity_type: "User",
///     id: "test1".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 409);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::AlreadyExists { .. } => 409,
        RepositoryError::ConstraintViolation { .. } => 422,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_) | RepositoryError::Serialization(_) => 500,
        RepositoryError::InvalidData(_) => 400,
    }
}
