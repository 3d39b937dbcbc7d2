//! Admin panel operations. Every method requires the `admin` role.

pub mod service;

pub use service::{AdminRepositories, AdminService, AdminStats, UpdateUserRequest};
