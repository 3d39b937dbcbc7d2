//! Route handlers, one module per area.

pub mod admin;
pub mod contact;
pub mod health;
pub mod materials;
pub mod planner;
pub mod profile;
