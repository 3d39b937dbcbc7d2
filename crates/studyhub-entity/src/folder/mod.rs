//! Folder domain entities.

pub mod model;
pub mod node;
pub mod tree;

pub use model::{Folder, normalize_tags, validate_folder_id, validate_folder_name};
pub use node::{FolderNode, FolderSummary};
pub use tree::{FolderEntry, FolderTree, RemovedSubtree};
