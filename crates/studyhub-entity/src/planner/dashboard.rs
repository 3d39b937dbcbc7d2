//! Dashboard summary derived from a planner document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::model::{UserData, parse_planner_date};

/// A dated entry that falls on or after the reference day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingItem {
    pub name: String,
    pub date: NaiveDate,
    pub days_until: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
}

/// Counts and upcoming deadlines for the dashboard page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub task_count: usize,
    pub assignment_count: usize,
    pub exam_count: usize,
    pub record_count: usize,
    /// Mean progress over tasks and assignments that report one.
    pub average_progress: Option<f64>,
    /// Exams on or after today, soonest first.
    pub upcoming_exams: Vec<UpcomingItem>,
    /// Assignments due on or after today, soonest first.
    pub upcoming_assignments: Vec<UpcomingItem>,
}

impl UserData {
    /// Summarize the document relative to `today`. Entries whose date does
    /// not parse are counted but never listed as upcoming.
    pub fn dashboard(&self, today: NaiveDate) -> Dashboard {
        let upcoming = |name: &str, date: &str, progress: Option<u8>| {
            parse_planner_date(date)
                .filter(|d| *d >= today)
                .map(|d| UpcomingItem {
                    name: name.to_string(),
                    date: d,
                    days_until: (d - today).num_days(),
                    progress,
                })
        };

        let mut upcoming_exams: Vec<UpcomingItem> = self
            .exams
            .iter()
            .filter_map(|e| upcoming(&e.name, &e.date, None))
            .collect();
        upcoming_exams.sort_by_key(|u| u.date);

        let mut upcoming_assignments: Vec<UpcomingItem> = self
            .assignments
            .iter()
            .filter_map(|a| upcoming(&a.name, &a.date, a.progress))
            .collect();
        upcoming_assignments.sort_by_key(|u| u.date);

        let progress: Vec<u8> = self
            .tasks
            .iter()
            .filter_map(|t| t.progress)
            .chain(self.assignments.iter().filter_map(|a| a.progress))
            .collect();
        let average_progress = (!progress.is_empty()).then(|| {
            progress.iter().map(|p| f64::from(*p)).sum::<f64>() / progress.len() as f64
        });

        Dashboard {
            task_count: self.tasks.len(),
            assignment_count: self.assignments.len(),
            exam_count: self.exams.len(),
            record_count: self.records.len(),
            average_progress,
            upcoming_exams,
            upcoming_assignments,
        }
    }
}
