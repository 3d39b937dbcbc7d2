//! Contact and support form.

pub mod service;

pub use service::{ContactService, SubmitContactRequest};
