//! Per-user planner: tasks, assignments, exams, and records.

pub mod service;

pub use service::{AddEntryRequest, PlannerService};
