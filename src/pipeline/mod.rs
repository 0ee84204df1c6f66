//! Stylesheet build pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────┐   ┌───────┐   ┌─────┐   ┌────────┐   ┌───────┐
//! │ compile  │ → │ svg │ → │ split │ → │ amp │ → │ minify │ → │ write │
//! │ (grass)  │   └─────┘   └───────┘   └─────┘   │ (opt.) │   └───────┘
//! └──────────┘                                   └────────┘
//! ```
//!
//! Compilation and writing are the I/O ends. Everything in between is a
//! [`Transform`] over `Vec<Blob>`, applied in the order listed in the
//! [`Pipeline`]. Nothing is written unless every entry compiled and every
//! stage succeeded, so a failed build never touches previous output.

mod blob;
pub mod compile;
mod error;
pub mod transform;
pub mod write;

use std::path::PathBuf;
use std::time::{Duration, Instant};

pub use blob::{Blob, Variant};
pub use error::PipelineError;
pub use transform::{AmpSanitizer, MediaSplitter, Minifier, SvgInliner, Transform};
pub use write::WriteOutcome;

use crate::config::Config;
use crate::debug;

/// Ordered list of transforms.
pub struct Pipeline {
    stages: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage.
    pub fn pipe(mut self, stage: impl Transform + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// svg → split → amp → minify, dropping the stages config disables.
    pub fn from_config(config: &Config) -> Self {
        let mut pipeline = Self::new();
        if config.svg.inline {
            pipeline = pipeline.pipe(SvgInliner::new(config.svg.malformed));
        }
        pipeline = pipeline
            .pipe(MediaSplitter::new(config.output.split.clone()))
            .pipe(AmpSanitizer);
        if config.output.minify {
            pipeline = pipeline.pipe(Minifier);
        }
        pipeline
    }

    #[cfg(test)]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run every stage in order, stopping at the first error.
    pub fn run(&self, blobs: Vec<Blob>) -> Result<Vec<Blob>, PipelineError> {
        self.stages.iter().try_fold(blobs, |blobs, stage| {
            let count = blobs.len();
            let blobs = stage.apply(blobs)?;
            debug!("build"; "{}: {} -> {} blob(s)", stage.name(), count, blobs.len());
            Ok(blobs)
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of one successful build cycle.
#[derive(Debug)]
pub struct BuildReport {
    pub entries: usize,
    pub outputs: Vec<(PathBuf, WriteOutcome)>,
    pub elapsed: Duration,
}

impl BuildReport {
    pub fn written(&self) -> impl Iterator<Item = &PathBuf> {
        self.outputs
            .iter()
            .filter(|(_, outcome)| *outcome == WriteOutcome::Written)
            .map(|(path, _)| path)
    }
}

/// Build once: discover, compile, transform, write.
pub fn build(config: &Config) -> Result<BuildReport, PipelineError> {
    let start = Instant::now();

    let entries = compile::discover_entries(&config.source)?;
    debug!("build"; "found {} entr{}", entries.len(), if entries.len() == 1 { "y" } else { "ies" });

    let compiled = compile::compile_all(&entries, &config.source)?;
    let blobs = Pipeline::from_config(config).run(compiled)?;
    let outputs = write::write_all(&blobs, &config.output.dir)?;

    Ok(BuildReport {
        entries: entries.len(),
        outputs,
        elapsed: start.elapsed(),
    })
}
