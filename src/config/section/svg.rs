//! `[svg]` section: inlining of svg data urls.
//!
//! # Example
//!
//! ```toml
//! [svg]
//! inline = true
//! malformed = "error"   # or "passthrough"
//! ```

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SvgConfig {
    /// Rewrite `data:image/svg+xml,` urls to base64.
    pub inline: bool,
    /// What to do with a payload that is not valid percent-encoded UTF-8.
    pub malformed: MalformedPolicy,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            inline: true,
            malformed: MalformedPolicy::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Fail the build, naming the offending url.
    #[default]
    Error,
    /// Keep the url as written and log a warning.
    Passthrough,
}
