pub mod entities;
pub mod requests;

pub use entities::{User, UserRole, UserStatus};
pub use requests::CreateUserRequest;
