//! HTTP handlers for auth routes.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use serde::Serialize;
use warbler_core::auth::{authenticate, calculate_expiry, generate_session_id, signup, Session};
use warbler_core::social::{validate_signup_form, LoginRequest, SignupRequest, User};

use crate::error::AuthError;
use crate::extractors::{session_id_from_headers, CurrentUser};
use crate::AuthState;

/// Body returned after signup and login.
///
/// `token` is the session id; API clients send it back as a bearer token.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: User,
    pub token: String,
}

/// Creates the auth router with all authentication routes.
///
/// Routes:
/// - `POST /auth/signup` - Create an account and log in
/// - `POST /auth/login` - Log in with username and password
/// - `POST /auth/logout` - End current session
/// - `GET /auth/me` - Get current authenticated user
pub fn auth_routes() -> Router<AuthState> {
    Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

async fn signup_handler(
    State(state): State<AuthState>,
    jar: CookieJar,
    Form(request): Form<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<SessionResponse>), AuthError> {
    let request = request.normalized();
    validate_signup_form(&request)?;

    let user = signup(state.users.as_ref(), request).await?;
    let (jar, session) = start_session(&state, jar, &user).await?;

    Ok((
        StatusCode::CREATED,
        jar,
        Json(SessionResponse {
            user,
            token: session.id.to_string(),
        }),
    ))
}

async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    Form(request): Form<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>), AuthError> {
    let username = request.username.trim();
    let user = authenticate(state.users.as_ref(), username, &request.password)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let (jar, session) = start_session(&state, jar, &user).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok((
        jar,
        Json(SessionResponse {
            user,
            token: session.id.to_string(),
        }),
    ))
}

async fn logout(
    State(state): State<AuthState>,
    CurrentUser(user): CurrentUser,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), AuthError> {
    if let Ok(Some(session_id)) = session_id_from_headers(&headers, &state.config.cookie_name) {
        state.sessions.delete_session(&session_id).await?;
    }

    tracing::info!(user_id = %user.id, "User logged out");

    let jar = jar.remove(Cookie::build((state.config.cookie_name.clone(), "")).path("/"));
    Ok((jar, StatusCode::NO_CONTENT))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

/// Stores a new session for `user` and adds the session cookie to the jar.
async fn start_session(
    state: &AuthState,
    jar: CookieJar,
    user: &User,
) -> Result<(CookieJar, Session), AuthError> {
    let now = Utc::now();
    let session = Session {
        id: generate_session_id(),
        user_id: user.id,
        created_at: now,
        expires_at: calculate_expiry(now, state.config.session_ttl_chrono()),
    };
    state.sessions.create_session(&session).await?;

    let cookie = Cookie::build((state.config.cookie_name.clone(), session.id.to_string()))
        .path("/")
        .http_only(true)
        .secure(state.config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(
            state.config.session_ttl.as_secs() as i64
        ))
        .build();

    Ok((jar.add(cookie), session))
}
