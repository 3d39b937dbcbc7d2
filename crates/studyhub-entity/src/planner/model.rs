//! The per-user planner document.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use studyhub_core::error::AppError;
use studyhub_core::result::AppResult;

/// A scheduled study task, e.g. `{name: "Math Study", time: "2:00 PM - 4:00 PM"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
}

/// An assignment with a due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub name: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
}

/// A named entry with a date. Used for exams and study records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedItem {
    pub name: String,
    pub date: String,
}

/// One list inside the planner document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlannerSection {
    Tasks,
    Assignments,
    Exams,
    Records,
}

impl PlannerSection {
    /// All sections in display order.
    pub const ALL: [PlannerSection; 4] = [
        Self::Tasks,
        Self::Assignments,
        Self::Exams,
        Self::Records,
    ];

    /// Return the section name as used in the document and in URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Assignments => "assignments",
            Self::Exams => "exams",
            Self::Records => "records",
        }
    }

    /// Whether entries in this section carry a progress percentage.
    pub fn tracks_progress(&self) -> bool {
        matches!(self, Self::Tasks | Self::Assignments)
    }
}

impl fmt::Display for PlannerSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlannerSection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tasks" | "task" => Ok(Self::Tasks),
            "assignments" | "assignment" => Ok(Self::Assignments),
            "exams" | "exam" => Ok(Self::Exams),
            "records" | "record" => Ok(Self::Records),
            _ => Err(AppError::validation(format!(
                "Unknown planner section '{s}'. Expected one of: tasks, assignments, exams, records"
            ))),
        }
    }
}

/// Parse a planner date. Accepts ISO `2023-05-15` (what date inputs submit)
/// and long form `May 15, 2023`.
pub fn parse_planner_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    ["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// The planner document kept for each user.
///
/// Missing lists deserialize as empty, so documents written before a
/// section existed still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub exams: Vec<DatedItem>,
    #[serde(default)]
    pub records: Vec<DatedItem>,
}

impl UserData {
    /// Number of entries in a section.
    pub fn len(&self, section: PlannerSection) -> usize {
        match section {
            PlannerSection::Tasks => self.tasks.len(),
            PlannerSection::Assignments => self.assignments.len(),
            PlannerSection::Exams => self.exams.len(),
            PlannerSection::Records => self.records.len(),
        }
    }

    /// Whether every section is empty.
    pub fn is_empty(&self) -> bool {
        PlannerSection::ALL.iter().all(|s| self.len(*s) == 0)
    }

    /// Append an entry. `when` is the time range for tasks and the date for
    /// every other section. Returns the new entry's index.
    pub fn add(&mut self, section: PlannerSection, name: &str, when: &str) -> AppResult<usize> {
        let name = name.trim();
        let when = when.trim();
        if name.is_empty() {
            return Err(AppError::validation("Name cannot be empty"));
        }
        if when.is_empty() {
            return Err(AppError::validation(match section {
                PlannerSection::Tasks => "Time cannot be empty",
                _ => "Date cannot be empty",
            }));
        }
        if section != PlannerSection::Tasks && parse_planner_date(when).is_none() {
            return Err(AppError::validation(format!(
                "Invalid date '{when}'. Use YYYY-MM-DD"
            )));
        }

        let (name, when) = (name.to_string(), when.to_string());
        match section {
            PlannerSection::Tasks => self.tasks.push(Task {
                name,
                time: when,
                progress: None,
            }),
            PlannerSection::Assignments => self.assignments.push(Assignment {
                name,
                date: when,
                progress: None,
            }),
            PlannerSection::Exams => self.exams.push(DatedItem { name, date: when }),
            PlannerSection::Records => self.records.push(DatedItem { name, date: when }),
        }
        Ok(self.len(section) - 1)
    }

    /// Remove the entry at `index`.
    pub fn remove(&mut self, section: PlannerSection, index: usize) -> AppResult<()> {
        if index >= self.len(section) {
            return Err(AppError::not_found(format!(
                "No {section} entry at index {index}"
            )));
        }
        match section {
            PlannerSection::Tasks => {
                self.tasks.remove(index);
            }
            PlannerSection::Assignments => {
                self.assignments.remove(index);
            }
            PlannerSection::Exams => {
                self.exams.remove(index);
            }
            PlannerSection::Records => {
                self.records.remove(index);
            }
        }
        Ok(())
    }

    /// Set the completion percentage of a task or assignment.
    pub fn set_progress(
        &mut self,
        section: PlannerSection,
        index: usize,
        progress: u8,
    ) -> AppResult<()> {
        if !section.tracks_progress() {
            return Err(AppError::validation(format!(
                "Entries in {section} do not track progress"
            )));
        }
        if progress > 100 {
            return Err(AppError::validation("Progress must be between 0 and 100"));
        }
        let slot = match section {
            PlannerSection::Tasks => self.tasks.get_mut(index).map(|t| &mut t.progress),
            PlannerSection::Assignments => {
                self.assignments.get_mut(index).map(|a| &mut a.progress)
            }
            _ => None,
        };
        let slot = slot.ok_or_else(|| {
            AppError::not_found(format!("No {section} entry at index {index}"))
        })?;
        *slot = Some(progress);
        Ok(())
    }
}
