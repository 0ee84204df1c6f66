//! `[output]` section: output directory and media splits.
//!
//! # Example
//!
//! ```toml
//! [output]
//! dir = "assets/css"
//! minify = false
//!
//! [[output.split]]
//! media = "all"
//! filename = "site.css"
//!
//! [[output.split]]
//! media = "all"
//! filename = "amp.css"
//! amp = true
//! ```
//!
//! `media` is `"all"` (every rule), `"none"` (rules outside `@media`) or a
//! media query such as `"(min-width: 768px)"`.

use crate::config::{ConfigDiagnostics, FieldPath};
use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the stylesheets are written to.
    pub dir: PathBuf,
    /// Minify every output after splitting.
    pub minify: bool,
    /// Named outputs, one file each per entry.
    pub split: Vec<SplitConfig>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "assets/css".into(),
            minify: false,
            split: vec![
                SplitConfig::new(MediaBucket::All, "site.css"),
                SplitConfig::new(MediaBucket::All, "amp.css"),
            ],
        }
    }
}

impl OutputConfig {
    pub const SPLIT: FieldPath = FieldPath::new("output.split");
    pub const FILENAME: FieldPath = FieldPath::new("output.split.filename");
    pub const MEDIA: FieldPath = FieldPath::new("output.split.media");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.split.is_empty() {
            diag.error_with_hint(
                Self::SPLIT,
                "no outputs configured",
                "add at least one [[output.split]] table",
            );
            return;
        }

        let mut seen = FxHashSet::default();
        for split in &self.split {
            let name = split.filename.as_str();
            if matches!(&split.media, MediaBucket::Query(query) if query.is_empty()) {
                diag.error_with_hint(
                    Self::MEDIA,
                    format!("empty media query for `{name}`"),
                    "use \"all\", \"none\" or a query such as \"(min-width: 768px)\"",
                );
            }
            if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
                diag.error(
                    Self::FILENAME,
                    format!("`{name}` is not a plain file name"),
                );
            } else if !name.ends_with(".css") {
                diag.error(Self::FILENAME, format!("`{name}` must end with `.css`"));
            }
            if !seen.insert(name) {
                diag.error_with_hint(
                    Self::FILENAME,
                    format!("`{name}` is used by more than one split"),
                    "every split must write its own file",
                );
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SplitConfig {
    #[serde(default)]
    pub media: MediaBucket,
    pub filename: String,
    /// Strip `!important` from this output. Defaults to true for `amp.css`.
    #[serde(default)]
    pub amp: Option<bool>,
}

impl SplitConfig {
    pub fn new(media: MediaBucket, filename: impl Into<String>) -> Self {
        Self {
            media,
            filename: filename.into(),
            amp: None,
        }
    }

    pub fn is_amp(&self) -> bool {
        self.amp.unwrap_or_else(|| {
            Path::new(&self.filename)
                .file_stem()
                .is_some_and(|stem| stem == "amp")
        })
    }
}

/// Which rules of a compiled stylesheet go into a split.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum MediaBucket {
    /// The whole stylesheet, unchanged.
    #[default]
    All,
    /// Top-level rules that are not inside an `@media` block.
    Base,
    /// `@media` blocks with exactly this query.
    Query(String),
}

impl From<String> for MediaBucket {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Self::All,
            "none" => Self::Base,
            _ => Self::Query(value.trim().to_string()),
        }
    }
}

impl fmt::Display for MediaBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Base => write!(f, "none"),
            Self::Query(query) => write!(f, "{query}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_default_splits() {
        let config = test_parse_config("");
        let split = &config.output.split;
        assert_eq!(split.len(), 2);
        assert_eq!(split[0].filename, "site.css");
        assert_eq!(split[0].media, MediaBucket::All);
        assert!(!split[0].is_amp());
        assert_eq!(split[1].filename, "amp.css");
        assert!(split[1].is_amp());
    }

    #[test]
    fn test_custom_splits_replace_defaults() {
        let config = test_parse_config(
            r#"
[[output.split]]
media = "none"
filename = "base.css"

[[output.split]]
media = "(min-width: 768px)"
filename = "wide.css"
amp = true
"#,
        );
        let split = &config.output.split;
        assert_eq!(split.len(), 2);
        assert_eq!(split[0].media, MediaBucket::Base);
        assert_eq!(
            split[1].media,
            MediaBucket::Query("(min-width: 768px)".into())
        );
        assert!(split[1].is_amp());
    }

    #[test]
    fn test_amp_override() {
        let mut split = SplitConfig::new(MediaBucket::All, "amp.css");
        split.amp = Some(false);
        assert!(!split.is_amp());
    }

    #[test]
    fn test_validate_duplicate_filename() {
        let output = OutputConfig {
            split: vec![
                SplitConfig::new(MediaBucket::All, "site.css"),
                SplitConfig::new(MediaBucket::Base, "site.css"),
            ],
            ..OutputConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        output.validate(&mut diag);
        assert_eq!(diag.errors().len(), 1);
        assert!(diag.errors()[0].message.contains("more than one"));
    }

    #[test]
    fn test_validate_bad_filenames() {
        let output = OutputConfig {
            split: vec![
                SplitConfig::new(MediaBucket::All, "css/site.css"),
                SplitConfig::new(MediaBucket::All, "amp.scss"),
            ],
            ..OutputConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        output.validate(&mut diag);
        assert_eq!(diag.errors().len(), 2);
    }

    #[test]
    fn test_validate_empty_media_query() {
        let config = test_parse_config(
            r#"
[[output.split]]
media = "  "
filename = "site.css"
"#,
        );
        assert_eq!(
            config.output.split[0].media,
            MediaBucket::Query(String::new())
        );

        let mut diag = ConfigDiagnostics::new();
        config.output.validate(&mut diag);
        assert_eq!(diag.errors().len(), 1);
        assert_eq!(diag.errors()[0].field, OutputConfig::MEDIA);
    }

    #[test]
    fn test_validate_empty() {
        let output = OutputConfig {
            split: Vec::new(),
            ..OutputConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        output.validate(&mut diag);
        assert!(!diag.is_empty());
    }
}
