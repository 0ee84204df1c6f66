//! Blob transforms.
//!
//! Each transform takes the full blob list and returns a new one, so a
//! stage can rewrite text (svg, amp, minify) or fan one blob out into
//! several (split).
//!
//! # Modules
//!
//! - `svg`: base64-encodes `data:image/svg+xml,` urls
//! - `split`: media-bucket splitting into named outputs
//! - `amp`: strips `!important` from AMP outputs
//! - `minify`: optional lightningcss minification

mod amp;
mod minify;
mod split;
mod svg;

pub use amp::AmpSanitizer;
pub use minify::Minifier;
pub use split::MediaSplitter;
pub use svg::{DecodeError, SvgInliner};

use super::{Blob, PipelineError};

/// A pipeline stage.
pub trait Transform {
    /// Short label used in debug logs.
    fn name(&self) -> &'static str;

    fn apply(&self, blobs: Vec<Blob>) -> Result<Vec<Blob>, PipelineError>;
}
