pub mod error;
pub mod follows;
pub mod health;
pub mod messages;
pub mod profile;
pub mod users;

pub use error::AppError;
