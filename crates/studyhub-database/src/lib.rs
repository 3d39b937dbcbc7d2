//! # studyhub-database
//!
//! SQLite connection management and concrete repository implementations
//! for all StudyHub entities.
//!
//! Read-only queries run against the pool. Mutations take a
//! `&mut SqliteConnection` so the service layer can group them into one
//! transaction (`repo.begin()` then `&mut *tx`).

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
