//! Axum extractors for authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use warbler_core::auth::{is_session_expired, SessionId};
use warbler_core::social::User;

use crate::AuthState;

/// Reads the session id from `Authorization: Bearer`, falling back to the
/// session cookie.
///
/// `Err` means an Authorization header was sent but is not valid UTF-8.
pub(crate) fn session_id_from_headers(
    headers: &HeaderMap,
    cookie_name: &str,
) -> Result<Option<SessionId>, &'static str> {
    if let Some(auth_header) = headers.get(AUTHORIZATION) {
        let header_value = auth_header
            .to_str()
            .map_err(|_| "Invalid authorization header")?;

        if let Some(token) = header_value.strip_prefix("Bearer ") {
            return Ok(Some(SessionId::new(token.to_string())));
        }
    }

    let jar = CookieJar::from_headers(headers);
    Ok(jar
        .get(cookie_name)
        .map(|cookie| SessionId::new(cookie.value().to_string())))
}

/// Extractor for authenticated user. Returns 401 if not authenticated.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let session_id = session_id_from_headers(&parts.headers, &auth_state.config.cookie_name)
            .map_err(|msg| (StatusCode::UNAUTHORIZED, msg))?
            .ok_or((StatusCode::UNAUTHORIZED, "Access unauthorized."))?;

        let session = auth_state
            .sessions
            .get_session(&session_id)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "Session lookup failed"))?
            .ok_or((StatusCode::UNAUTHORIZED, "Session not found"))?;

        if is_session_expired(&session, Utc::now()) {
            return Err((StatusCode::UNAUTHORIZED, "Session expired"));
        }

        let user = auth_state
            .users
            .get_user(session.user_id)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "User lookup failed"))?
            .ok_or((StatusCode::UNAUTHORIZED, "User not found"))?;

        Ok(CurrentUser(user))
    }
}

/// Extractor for optionally authenticated user. Returns None if not authenticated.
pub struct OptionalUser(pub Option<User>);

impl<S> FromRequestParts<S> for OptionalUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let session_id =
            match session_id_from_headers(&parts.headers, &auth_state.config.cookie_name) {
                Ok(Some(id)) => id,
                _ => return Ok(OptionalUser(None)),
            };

        let session = match auth_state.sessions.get_session(&session_id).await {
            Ok(Some(s)) => s,
            _ => return Ok(OptionalUser(None)),
        };

        if is_session_expired(&session, Utc::now()) {
            return Ok(OptionalUser(None));
        }

        let user = match auth_state.users.get_user(session.user_id).await {
            Ok(user) => user,
            Err(_) => None,
        };

        Ok(OptionalUser(user))
    }
}
