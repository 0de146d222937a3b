use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use warbler_auth::auth_routes;

use crate::{
    handlers::{
        follows::{follow_user, unfollow_user},
        health::healthz,
        messages::{create_message, delete_message, get_message, timeline},
        profile::{delete_profile, get_profile, update_profile},
        users::{get_user, list_followers, list_following, list_user_messages, list_users},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // API routes with CORS
    let api_routes = Router::new()
        // User routes
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/following", get(list_following))
        .route("/users/{id}/followers", get(list_followers))
        .route("/users/{id}/messages", get(list_user_messages))
        .route("/users/{id}/follow", post(follow_user).delete(unfollow_user))
        // Own profile
        .route(
            "/profile",
            get(get_profile).patch(update_profile).delete(delete_profile),
        )
        // Message routes
        .route("/messages", post(create_message))
        .route("/messages/{id}", get(get_message).delete(delete_message))
        .route("/timeline", get(timeline))
        .layer(cors);

    let auth_state = state.auth.clone();

    // Main application router
    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api", api_routes)
        .with_state(state)
        .merge(auth_routes().with_state(auth_state))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
}
