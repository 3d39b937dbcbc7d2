//! File domain entities.

pub mod model;

pub use model::{StoredFile, blob_path, validate_file_name};
