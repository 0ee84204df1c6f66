//! CSS minification with lightningcss.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};

use super::Transform;
use crate::pipeline::{Blob, PipelineError};

/// Encode a browser version the way lightningcss expects (`major << 16`).
const fn version(major: u32) -> Option<u32> {
    Some(major << 16)
}

/// Oldest browsers the output must keep working in.
///
/// None of these understand media query range syntax, so lightningcss
/// keeps printing `(min-width: ...)` instead of `(width >= ...)`.
const BASELINE: Browsers = Browsers {
    android: version(80),
    chrome: version(80),
    edge: version(80),
    firefox: version(60),
    ie: None,
    ios_saf: version(13),
    opera: version(67),
    safari: version(13),
    samsung: version(13),
};

/// Printer options shared by every lightningcss reprint.
pub(super) fn printer_options(minify: bool) -> PrinterOptions<'static> {
    PrinterOptions {
        minify,
        targets: Targets::from(BASELINE),
        ..PrinterOptions::default()
    }
}

/// Minify CSS source code.
fn minify_css(source: &str) -> Result<String, String> {
    let stylesheet =
        StyleSheet::parse(source, ParserOptions::default()).map_err(|e| e.to_string())?;
    let result = stylesheet
        .to_css(printer_options(true))
        .map_err(|e| e.to_string())?;
    Ok(result.code)
}

pub struct Minifier;

impl Transform for Minifier {
    fn name(&self) -> &'static str {
        "minify"
    }

    fn apply(&self, blobs: Vec<Blob>) -> Result<Vec<Blob>, PipelineError> {
        blobs
            .into_iter()
            .map(|mut blob| {
                blob.css = minify_css(&blob.css).map_err(|message| PipelineError::Minify {
                    blob: blob.name.clone(),
                    message,
                })?;
                Ok(blob)
            })
            .collect()
    }
}
