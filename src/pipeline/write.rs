//! Writes blobs to the output directory.
//!
//! Every file goes to a temporary sibling first and is then renamed over
//! the destination, so readers see either the previous stylesheet or the
//! new one. Files whose content did not change are left alone.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use tempfile::NamedTempFile;

use super::{Blob, PipelineError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Unchanged,
}

/// Write every blob below `out_dir`, returning the destinations in blob order.
///
/// Destinations are checked for duplicates before anything is written.
pub fn write_all(
    blobs: &[Blob],
    out_dir: &Path,
) -> Result<Vec<(PathBuf, WriteOutcome)>, PipelineError> {
    let targets: Vec<PathBuf> = blobs
        .iter()
        .map(|blob| out_dir.join(blob.relative_path()))
        .collect();

    let mut seen = FxHashSet::default();
    for target in &targets {
        if !seen.insert(target) {
            return Err(PipelineError::DuplicateOutput(target.clone()));
        }
    }

    blobs
        .iter()
        .zip(targets)
        .map(|(blob, target)| {
            let outcome = write_atomic(&target, blob.css.as_bytes())?;
            Ok((target, outcome))
        })
        .collect()
}

/// Replace `path` with `contents` via a temporary file in the same directory.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<WriteOutcome, PipelineError> {
    if fs::read(path).is_ok_and(|existing| existing == contents) {
        return Ok(WriteOutcome::Unchanged);
    }

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(PipelineError::io(dir))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(PipelineError::io(dir))?;
    tmp.write_all(contents).map_err(PipelineError::io(tmp.path()))?;
    set_output_permissions(tmp.as_file(), path).map_err(PipelineError::io(tmp.path()))?;

    tmp.persist(path)
        .map_err(|e| PipelineError::io(path)(e.error))?;
    Ok(WriteOutcome::Written)
}

/// Temp files are created owner-only; stylesheets must stay world-readable.
#[cfg(unix)]
fn set_output_permissions(file: &fs::File, dest: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = match fs::metadata(dest) {
        Ok(meta) => meta.permissions(),
        Err(_) => fs::Permissions::from_mode(0o644),
    };
    file.set_permissions(permissions)
}

#[cfg(not(unix))]
fn set_output_permissions(_file: &fs::File, _dest: &Path) -> std::io::Result<()> {
    Ok(())
}
