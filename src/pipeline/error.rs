//! Pipeline error types.

use std::path::PathBuf;
use thiserror::Error;

use super::transform::DecodeError;

/// Everything that can stop a build cycle.
///
/// A build that returns one of these has written nothing.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("source directory `{}` does not exist", .0.display())]
    SourceDir(PathBuf),

    #[error("no `{entry}` found under `{}`", .dir.display())]
    NoEntries { entry: String, dir: PathBuf },

    #[error("failed to compile `{}`:\n{message}", .path.display())]
    Compile { path: PathBuf, message: String },

    #[error("malformed svg data url in {blob}: {reason}\n  --> {context}")]
    Svg {
        blob: String,
        context: String,
        reason: DecodeError,
    },

    #[error("failed to split {blob} for media `{media}`: {message}")]
    Split {
        blob: String,
        media: String,
        message: String,
    },

    #[error("failed to minify {blob}: {message}")]
    Minify { blob: String, message: String },

    #[error("`{}` would be written more than once", .0.display())]
    DuplicateOutput(PathBuf),

    #[error("IO error at `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
