//! AMP sanitizer: AMP stylesheets may not use `!important`.
//!
//! This is a plain text pass. `!important` inside a comment or a string
//! literal is stripped too, and `! important` or `!IMPORTANT` are left
//! alone.

use std::sync::LazyLock;

use regex::Regex;

use super::Transform;
use crate::pipeline::{Blob, PipelineError};

static IMPORTANT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*!important").unwrap());

/// Remove every `!important`, together with the whitespace before it.
fn strip_important(css: &str) -> String {
    IMPORTANT.replace_all(css, "").into_owned()
}

/// Applies [`strip_important`] to AMP blobs and passes the rest through.
pub struct AmpSanitizer;

impl Transform for AmpSanitizer {
    fn name(&self) -> &'static str {
        "amp"
    }

    fn apply(&self, blobs: Vec<Blob>) -> Result<Vec<Blob>, PipelineError> {
        Ok(blobs
            .into_iter()
            .map(|mut blob| {
                if blob.is_amp() {
                    blob.css = strip_important(&blob.css);
                }
                blob
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Variant;

    #[test]
    fn test_strip_with_leading_whitespace() {
        assert_eq!(strip_important("color: red !important;"), "color: red;");
        assert_eq!(strip_important("a{color:red\n\t !important}"), "a{color:red}");
    }

    #[test]
    fn test_strip_every_occurrence() {
        assert_eq!(
            strip_important("a{color:red!important;margin:0 !important}"),
            "a{color:red;margin:0}"
        );
    }

    #[test]
    fn test_known_limitations() {
        // text pass: comments lose it too, spaced or upper-case forms survive
        assert_eq!(strip_important("/* !important */"), "/* */");
        assert_eq!(strip_important("a{color:red ! important}"), "a{color:red ! important}");
        assert_eq!(strip_important("a{color:red !IMPORTANT}"), "a{color:red !IMPORTANT}");
    }

    #[test]
    fn test_only_amp_blobs_change() {
        let css = "body{color:red !important}";
        let blobs = vec![
            Blob::new("site.css", css),
            Blob::new("amp.css", css).with_variant(Variant::Amp),
        ];
        let out = AmpSanitizer.apply(blobs).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "site.css");
        assert_eq!(out[0].css, css);
        assert_eq!(out[1].name, "amp.css");
        assert_eq!(out[1].css, "body{color:red}");
    }
}
