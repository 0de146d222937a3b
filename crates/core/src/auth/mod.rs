mod accounts;
mod error;
mod functions;
mod password;
mod traits;
mod types;

pub use accounts::{authenticate, signup};
pub use error::AuthError;
pub use functions::{calculate_expiry, generate_session_id, is_session_expired};
pub use password::{hash_password, verify_password};
pub use traits::{Result, SessionRepository};
pub use types::{Session, SessionId};
