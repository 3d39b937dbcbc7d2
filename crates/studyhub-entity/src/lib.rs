//! # studyhub-entity
//!
//! Domain entity models for StudyHub: the study-materials folder tree and
//! its files, user profiles and roles, the per-user planner document,
//! contact requests and the deferred blob deletion queue. Simple
//! table-backed entities additionally derive `sqlx::FromRow`.

pub mod blob;
pub mod contact;
pub mod file;
pub mod folder;
pub mod planner;
pub mod user;
