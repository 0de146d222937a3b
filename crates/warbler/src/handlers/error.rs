use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use warbler_core::social::{MessageError, SignupFormError};
use warbler_core::storage::{repository_error_to_status_code, RepositoryError};

/// Request-level failures that are not storage errors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    #[error("You cannot follow yourself")]
    SelfFollow,
    #[error("Access unauthorized.")]
    Forbidden,
    #[error("Invalid credentials.")]
    InvalidCredentials,
}

impl ApiError {
    fn status_code(self) -> StatusCode {
        match self {
            Self::SelfFollow => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Application error type that wraps `anyhow::Error`.
///
/// The status code comes from the wrapped error: `RepositoryError` through
/// `repository_error_to_status_code`, `MessageError` and `SignupFormError`
/// as 400 and `ApiError` as its own code. Anything else is a 500. Server errors are logged and
/// their details are not sent to the client.
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_code(&self) -> StatusCode {
        if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            let code = repository_error_to_status_code(repo_error);
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        } else if self.0.downcast_ref::<MessageError>().is_some()
            || self.0.downcast_ref::<SignupFormError>().is_some()
        {
            StatusCode::BAD_REQUEST
        } else if let Some(api_error) = self.0.downcast_ref::<ApiError>() {
            api_error.status_code()
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!(error = %self.0, "Application error");
            return (status_code, "Something went wrong").into_response();
        }

        tracing::debug!(status = %status_code, error = %self.0, "Request rejected");
        (status_code, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_text(response: Response) -> String {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_repository_error_status() {
        let response = AppError::from(RepositoryError::NotFound {
            entity_type: "User",
            id: "abc".to_string(),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "User not found: abc");
    }

    #[tokio::test]
    async fn test_message_error_is_bad_request() {
        let response = AppError::from(MessageError::TextTooLong).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_form_error_is_bad_request() {
        let response = AppError::from(SignupFormError::UsernameTooLong).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_text(response).await,
            "Username too long (max 20 characters)"
        );
    }

    #[tokio::test]
    async fn test_api_errors() {
        assert_eq!(
            AppError::from(ApiError::Forbidden).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::from(ApiError::SelfFollow).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(ApiError::InvalidCredentials)
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let response =
            AppError::from(RepositoryError::QueryFailed("disk I/O error".to_string()))
                .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Something went wrong");
    }
}
