//! User domain entities.

pub mod model;
pub mod role;

pub use model::{Uploader, UserProfile};
pub use role::UserRole;
