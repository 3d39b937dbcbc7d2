//! Repository implementations for all StudyHub entities.

pub mod blob;
pub mod contact;
pub mod file;
pub mod folder;
pub mod planner;
pub mod user;

pub use blob::PendingDeletionRepository;
pub use contact::ContactRepository;
pub use file::FileRepository;
pub use folder::FolderRepository;
pub use planner::UserDataRepository;
pub use user::UserRepository;
