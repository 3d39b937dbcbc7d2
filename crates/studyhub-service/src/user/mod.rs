//! User profiles derived from identity tokens.

pub mod service;

pub use service::UserService;
