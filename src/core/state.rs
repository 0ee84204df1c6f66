//! Process lifecycle state.
//!
//! `SHUTDOWN` is the only cross-thread flag: the Ctrl+C handler sets it and
//! the watch loop polls it between debounce ticks.

use std::sync::atomic::{AtomicBool, Ordering};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Setup the global Ctrl+C handler. Call once before entering watch mode.
///
/// The first Ctrl+C lets an in-flight build finish and the loop exit on its
/// next poll; a second one exits immediately.
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        if SHUTDOWN.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
        crate::log!("watch"; "shutting down...");
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

/// Request shutdown without a signal (used when the watcher channel closes).
pub fn request_shutdown() {
    SHUTDOWN.store(true, Ordering::SeqCst);
}
