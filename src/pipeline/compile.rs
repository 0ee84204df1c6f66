//! Stylesheet compilation with grass.
//!
//! Output style is always compressed. Entries are found by file name
//! anywhere below `source.dir`, and each keeps its directory relative to
//! `source.dir` so output lands in the same layout.

use std::path::{Path, PathBuf};

use grass::{Options, OutputStyle};
use jwalk::WalkDir;

use super::{Blob, PipelineError};
use crate::config::SourceConfig;
use crate::utils::path::relative_dir;

/// Find every entry stylesheet, sorted by path.
pub fn discover_entries(source: &SourceConfig) -> Result<Vec<PathBuf>, PipelineError> {
    if !source.dir.is_dir() {
        return Err(PipelineError::SourceDir(source.dir.clone()));
    }

    let mut entries: Vec<PathBuf> = WalkDir::new(&source.dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_str() == Some(source.entry.as_str()))
        .map(|e| e.path())
        .collect();
    entries.sort();

    if entries.is_empty() {
        return Err(PipelineError::NoEntries {
            entry: source.entry.clone(),
            dir: source.dir.clone(),
        });
    }
    Ok(entries)
}

/// Compile one entry into a blob named after it (`site.scss` -> `site.css`).
pub fn compile_entry(entry: &Path, source: &SourceConfig) -> Result<Blob, PipelineError> {
    let options = Options::default()
        .style(OutputStyle::Compressed)
        .quiet(source.quiet)
        .load_paths(&source.load_paths);

    let css = grass::from_path(entry, &options).map_err(|e| PipelineError::Compile {
        path: entry.to_path_buf(),
        message: e.to_string(),
    })?;

    let stem = entry
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Blob::new(format!("{stem}.css"), css)
        .with_dir(relative_dir(entry, &source.dir))
        .with_origin(entry))
}

/// Compile every entry. Stops at the first failure.
pub fn compile_all(entries: &[PathBuf], source: &SourceConfig) -> Result<Vec<Blob>, PipelineError> {
    entries
        .iter()
        .map(|entry| compile_entry(entry, source))
        .collect()
}
