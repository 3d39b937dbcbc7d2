//! Planner domain entities: the per-user document and its dashboard view.

pub mod dashboard;
pub mod model;

pub use dashboard::{Dashboard, UpcomingItem};
pub use model::{Assignment, DatedItem, PlannerSection, Task, UserData, parse_planner_date};
