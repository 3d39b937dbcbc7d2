//! HTTP-level tests against a fully wired StudyHub router backed by an
//! in-memory database and in-memory blob storage.

mod helpers;

mod admin_test;
mod auth_test;
mod contact_test;
mod materials_test;
mod planner_test;
