//! Core types - process-wide state shared across the codebase.

mod state;

pub use state::{is_shutdown, request_shutdown, setup_shutdown_handler};
