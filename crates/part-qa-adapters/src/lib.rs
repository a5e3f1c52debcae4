//! Part QA Adapters - External adapters for part-qa.
//!
//! This crate provides adapters for:
//! - Filesystem image source
//! - Inspection history persistence

pub mod fs;
pub mod history;

pub use fs::{load_image, FsImageSource};
pub use history::{default_history_path, JsonlRecordStore};
