//! `[watch]` section: debounce timing for watch mode.

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Quiet window after the last event before rebuilding.
    pub debounce_ms: u64,
    /// Minimum gap between two rebuilds.
    pub cooldown_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            cooldown_ms: 800,
        }
    }
}

impl WatchConfig {
    pub const DEBOUNCE_MS: FieldPath = FieldPath::new("watch.debounce_ms");

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.debounce_ms == 0 {
            diag.error_with_hint(
                Self::DEBOUNCE_MS,
                "debounce must be greater than zero",
                "editors emit several events per save; 300 is a good default",
            );
        }
    }
}
