//! Core traits defined in `studyhub-core` and implemented by other crates.

pub mod storage;

pub use storage::StorageProvider;
