//! `[source]` section: where the sass tree lives.
//!
//! # Example
//!
//! ```toml
//! [source]
//! dir = "_sass"
//! entry = "site.scss"
//! load_paths = ["node_modules"]
//! extensions = ["scss", "sass"]
//! quiet = false
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Root of the sass tree, searched recursively for entries.
    pub dir: PathBuf,
    /// File name of an entry stylesheet.
    pub entry: String,
    /// Extra directories for `@use` / `@import` resolution.
    pub load_paths: Vec<PathBuf>,
    /// Extensions that trigger a rebuild in watch mode.
    pub extensions: Vec<String>,
    /// Suppress `@warn` and `@debug` output.
    pub quiet: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dir: "_sass".into(),
            entry: "site.scss".into(),
            load_paths: Vec::new(),
            extensions: vec!["scss".into(), "sass".into()],
            quiet: false,
        }
    }
}

impl SourceConfig {
    pub const ENTRY: FieldPath = FieldPath::new("source.entry");
    pub const EXTENSIONS: FieldPath = FieldPath::new("source.extensions");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.entry.trim().is_empty() {
            diag.error(Self::ENTRY, "entry file name must not be empty");
        } else if self.entry.contains(['/', '\\']) {
            diag.error_with_hint(
                Self::ENTRY,
                format!("`{}` is a path, expected a file name", self.entry),
                "entries are found by name anywhere under `source.dir`",
            );
        } else if self.entry.starts_with('_') {
            diag.error(
                Self::ENTRY,
                format!("`{}` is a sass partial and cannot be an entry", self.entry),
            );
        }

        if self.extensions.is_empty() {
            diag.error(Self::EXTENSIONS, "at least one watched extension is required");
        }
    }

    /// Whether `path` is a stylesheet source that should trigger a rebuild.
    pub fn is_source_file(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}
