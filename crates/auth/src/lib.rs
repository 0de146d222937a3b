//! Password login and sessions for warbler.
//!
//! This crate provides:
//! - Signup, login and logout routes backed by `warbler_core::auth`
//! - Session storage (in-memory, or SQLite via the `sqlite` feature)
//! - Axum extractors for the logged-in user

mod config;
mod error;
mod extractors;
mod handlers;
mod sessions;
mod state;

pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::{CurrentUser, OptionalUser};
pub use handlers::auth_routes;
pub use sessions::InMemorySessionStore;
#[cfg(feature = "sqlite")]
pub use sessions::SqliteSessionStore;
pub use state::AuthState;
