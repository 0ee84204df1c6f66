//! SVG inliner: `data:image/svg+xml,<raw>` urls become base64 urls.
//!
//! ```text
//! url("data:image/svg+xml,%3Csvg%3E%3C/svg%3E")
//!   -> url("data:image/svg+xml;base64,PHN2Zz48L3N2Zz4=")
//! ```
//!
//! Matches are collected first and then substituted by content, each pair
//! replacing the first remaining occurrence of its source text. Two
//! identical urls therefore always end up with the same replacement.
//! Already-encoded urls (`svg+xml;base64,`) never match, so the pass is
//! idempotent.

use std::borrow::Cow;
use std::sync::LazyLock;

use base64::prelude::*;
use percent_encoding::percent_decode_str;
use regex::Regex;
use thiserror::Error;

use super::Transform;
use crate::config::MalformedPolicy;
use crate::pipeline::{Blob, PipelineError};

/// Single-quoted, double-quoted and unquoted forms. The payload of a quoted
/// form runs non-greedily up to the same quote followed by `)`.
static SVG_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"url\((?:'data:image/svg\+xml,(.*?)'|"data:image/svg\+xml,(.*?)"|data:image/svg\+xml,([^'"()\s]*))\)"#,
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid percent escape at byte {0}")]
    InvalidEscape(usize),
    #[error("decoded payload is not valid UTF-8")]
    InvalidUtf8,
}

/// Strict URL component decoding.
///
/// Every `%` must start a two-digit hex escape and the decoded bytes must
/// be UTF-8. `+` stays a literal plus.
fn decode_uri_component(payload: &str) -> Result<String, DecodeError> {
    let bytes = payload.as_bytes();
    for (i, _) in bytes.iter().enumerate().filter(|(_, b)| **b == b'%') {
        let escape = bytes.get(i + 1..i + 3);
        if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
            return Err(DecodeError::InvalidEscape(i));
        }
    }

    percent_decode_str(payload)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| DecodeError::InvalidUtf8)
}

/// One url found during the scan.
#[derive(Debug)]
struct MatchRecord<'a> {
    source: &'a str,
    replacement: String,
}

/// Result of [`inline_svg_urls`].
#[derive(Debug)]
struct Inlined {
    css: String,
    /// Number of urls rewritten.
    inlined: usize,
    /// Urls left as written under [`MalformedPolicy::Passthrough`].
    skipped: Vec<(String, DecodeError)>,
}

/// Rewrite every svg data url in `css`.
///
/// With [`MalformedPolicy::Error`] the first undecodable url is returned
/// as `Err((url, reason))`. Text without svg urls comes back byte-identical.
fn inline_svg_urls(
    css: &str,
    policy: MalformedPolicy,
) -> Result<Inlined, (String, DecodeError)> {
    let mut records = Vec::new();
    let mut skipped = Vec::new();

    // The pattern never matches the empty string, so `captures_iter` always
    // advances past each match.
    for caps in SVG_URL.captures_iter(css) {
        let Some(whole) = caps.get(0) else { continue };
        let (quote, payload) = match (caps.get(1), caps.get(2), caps.get(3)) {
            (Some(payload), _, _) => ("'", payload),
            (_, Some(payload), _) => ("\"", payload),
            (_, _, Some(payload)) => ("", payload),
            _ => continue,
        };

        let svg = match decode_uri_component(payload.as_str()) {
            Ok(svg) => svg,
            Err(reason) => match policy {
                MalformedPolicy::Error => return Err((whole.as_str().to_string(), reason)),
                MalformedPolicy::Passthrough => {
                    skipped.push((whole.as_str().to_string(), reason));
                    continue;
                }
            },
        };

        let encoded = BASE64_STANDARD.encode(svg.as_bytes());
        records.push(MatchRecord {
            source: whole.as_str(),
            replacement: format!("url({quote}data:image/svg+xml;base64,{encoded}{quote})"),
        });
    }

    let inlined = records.len();
    let css = records.iter().fold(css.to_string(), |acc, record| {
        acc.replacen(record.source, &record.replacement, 1)
    });

    Ok(Inlined {
        css,
        inlined,
        skipped,
    })
}

/// Pipeline stage wrapping [`inline_svg_urls`].
pub struct SvgInliner {
    policy: MalformedPolicy,
}

impl SvgInliner {
    pub fn new(policy: MalformedPolicy) -> Self {
        Self { policy }
    }
}

impl Transform for SvgInliner {
    fn name(&self) -> &'static str {
        "svg"
    }

    fn apply(&self, blobs: Vec<Blob>) -> Result<Vec<Blob>, PipelineError> {
        blobs
            .into_iter()
            .map(|mut blob| {
                let result = inline_svg_urls(&blob.css, self.policy).map_err(
                    |(context, reason)| PipelineError::Svg {
                        blob: blob.name.clone(),
                        context,
                        reason,
                    },
                )?;

                for (url, reason) in &result.skipped {
                    crate::log!("svg"; "{}: kept malformed url ({}): {}", blob.name, reason, url);
                }
                crate::debug!("svg"; "{}: inlined {} url(s)", blob.name, result.inlined);

                blob.css = result.css;
                Ok(blob)
            })
            .collect()
    }
}
