mod error;
mod http_mapping;
mod profile;
mod traits;

pub use error::{RepositoryError, Result};
pub use http_mapping::repository_error_to_status_code;
pub use profile::load_profile;
pub use traits::{FollowRepository, MessageRepository, UserRepository};
