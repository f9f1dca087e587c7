//! Domain model for user accounts.

mod error;
mod ids;
mod user;

pub use error::UserDomainError;
pub use ids::UserId;
pub use user::{NewUser, User, UserUpdate};
