//! Contact request entities.

pub mod model;

pub use model::{ContactRequest, ContactStatus};
