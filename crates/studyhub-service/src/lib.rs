//! # studyhub-service
//!
//! Business logic service layer for StudyHub. Each service orchestrates
//! repositories, blob storage, and authenticated identity to implement
//! application-level use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod admin;
pub mod contact;
pub mod context;
pub mod janitor;
pub mod materials;
pub mod planner;
pub mod pomodoro;
pub mod user;

pub use admin::{AdminRepositories, AdminService, AdminStats, UpdateUserRequest};
pub use contact::{ContactService, SubmitContactRequest};
pub use context::RequestContext;
pub use janitor::{BlobJanitor, SweepReport};
pub use materials::{
    CreateFolderRequest, DeleteFolderOutcome, Download, FileService, FolderService, ImportSummary,
    MoveFileRequest, UpdateFolderRequest, UploadFileParams,
};
pub use planner::{AddEntryRequest, PlannerService};
pub use pomodoro::{Phase, PomodoroDriver, PomodoroEvent, PomodoroSnapshot, PomodoroTimer};
pub use user::UserService;
