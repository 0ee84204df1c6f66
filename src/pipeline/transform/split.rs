//! Media splitter: one compiled stylesheet becomes one blob per split.
//!
//! `all` copies the text untouched. `none` and explicit queries go through
//! lightningcss, select top-level rules and reprint them minified.

use lightningcss::rules::{CssRule, CssRuleList};
use lightningcss::stylesheet::{ParserOptions, StyleSheet};
use lightningcss::traits::ToCss;

use super::Transform;
use super::minify::printer_options;
use crate::config::{MediaBucket, SplitConfig};
use crate::pipeline::{Blob, PipelineError, Variant};

pub struct MediaSplitter {
    splits: Vec<SplitConfig>,
}

impl MediaSplitter {
    pub fn new(splits: Vec<SplitConfig>) -> Self {
        Self { splits }
    }
}

impl Transform for MediaSplitter {
    fn name(&self) -> &'static str {
        "split"
    }

    /// Emits, per input blob, exactly one blob per split in configured order.
    fn apply(&self, blobs: Vec<Blob>) -> Result<Vec<Blob>, PipelineError> {
        let mut out = Vec::with_capacity(blobs.len() * self.splits.len());
        for blob in &blobs {
            for split in &self.splits {
                let css = select_media(&blob.css, &split.media).map_err(|message| {
                    PipelineError::Split {
                        blob: blob.name.clone(),
                        media: split.media.to_string(),
                        message,
                    }
                })?;
                let variant = if split.is_amp() {
                    Variant::Amp
                } else {
                    Variant::Site
                };
                out.push(blob.derive(split.filename.as_str(), variant, css));
            }
        }
        Ok(out)
    }
}

/// Select the part of `css` that belongs to `bucket`.
fn select_media(css: &str, bucket: &MediaBucket) -> Result<String, String> {
    let query = match bucket {
        MediaBucket::All => return Ok(css.to_string()),
        MediaBucket::Base => None,
        MediaBucket::Query(query) => Some(
            canonical_query(query).ok_or_else(|| format!("invalid media query `{query}`"))?,
        ),
    };

    let sheet = StyleSheet::parse(css, ParserOptions::default()).map_err(|e| e.to_string())?;
    let rules: Vec<CssRule> = sheet
        .rules
        .0
        .iter()
        .filter(|rule| belongs(rule, query.as_deref()))
        .cloned()
        .collect();

    let selected = StyleSheet::new(
        sheet.sources.clone(),
        CssRuleList(rules),
        ParserOptions::default(),
    );
    let printed = selected
        .to_css(printer_options(true))
        .map_err(|e| e.to_string())?;
    Ok(printed.code)
}

/// `None` selects rules outside `@media`; `Some` selects matching `@media` blocks.
fn belongs(rule: &CssRule, query: Option<&str>) -> bool {
    match (rule, query) {
        (CssRule::Media(_), None) => false,
        (_, None) => true,
        (CssRule::Media(media), Some(query)) => print_query(media).is_some_and(|q| q == query),
        (_, Some(_)) => false,
    }
}

fn print_query(media: &lightningcss::rules::media::MediaRule<'_>) -> Option<String> {
    media
        .query
        .to_css_string(printer_options(false))
        .ok()
        .map(|q| normalize_whitespace(&q))
}

/// Print a configured query the way lightningcss prints parsed ones, so
/// `(min-width:768px)` and `(min-width: 768px)` compare equal.
fn canonical_query(query: &str) -> Option<String> {
    let probe = format!("@media {query}{{x{{color:red}}}}");
    let sheet = StyleSheet::parse(&probe, ParserOptions::default()).ok()?;
    sheet.rules.0.iter().find_map(|rule| match rule {
        CssRule::Media(media) => print_query(media),
        _ => None,
    })
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}
