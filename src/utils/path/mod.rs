//! Path utilities.
//!
//! - [`fs`]: filesystem path normalization and relative layout helpers

pub mod fs;

pub use fs::{normalize_path, relative_dir};
