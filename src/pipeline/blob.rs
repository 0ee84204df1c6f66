//! In-memory stylesheet flowing through the pipeline.

use std::path::{Path, PathBuf};

/// Provenance tag deciding which sanitizers apply to a blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    Site,
    /// AMP pages reject `!important`.
    Amp,
}

/// One CSS output file for one build cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// Output file name, e.g. `site.css`.
    pub name: String,
    /// Directory relative to the output root.
    pub dir: PathBuf,
    /// Entry stylesheet this blob was compiled from.
    pub origin: PathBuf,
    pub variant: Variant,
    pub css: String,
}

impl Blob {
    pub fn new(name: impl Into<String>, css: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dir: PathBuf::new(),
            origin: PathBuf::new(),
            variant: Variant::Site,
            css: css.into(),
        }
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn with_origin(mut self, origin: &Path) -> Self {
        self.origin = origin.to_path_buf();
        self
    }

    #[cfg(test)]
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    #[inline]
    pub fn is_amp(&self) -> bool {
        self.variant == Variant::Amp
    }

    /// Path below the output directory, e.g. `blog/amp.css`.
    pub fn relative_path(&self) -> PathBuf {
        self.dir.join(&self.name)
    }

    /// A sibling output of the same entry with new name, variant and text.
    pub fn derive(&self, name: impl Into<String>, variant: Variant, css: String) -> Self {
        Self {
            name: name.into(),
            dir: self.dir.clone(),
            origin: self.origin.clone(),
            variant,
            css,
        }
    }
}
