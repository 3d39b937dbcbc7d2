//! Study materials: the shared folder tree and the files stored in it.

pub mod file;
pub mod folder;

pub use file::{Download, FileService, ImportSummary, MoveFileRequest, UploadFileParams};
pub use folder::{CreateFolderRequest, DeleteFolderOutcome, FolderService, UpdateFolderRequest};
